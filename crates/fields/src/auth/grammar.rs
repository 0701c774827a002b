//! Character classes and a backtracking cursor for the RFC 7235 grammar.
//!
//! ```text
//! auth-param    = token BWS "=" BWS ( token / quoted-string )
//! token68       = 1*( ALPHA / DIGIT / "-" / "." / "_" / "~" / "+" / "/" ) *"="
//! quoted-string = DQUOTE *( qdtext / quoted-pair ) DQUOTE
//! ```

use std::borrow::Cow;

/// refer: RFC 9110 section 5.6.2
pub(crate) fn is_tchar(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~')
}

/// token68 characters, excluding the `=` padding that may only trail.
pub(crate) fn is_token68_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'-' | b'.' | b'_' | b'~' | b'+' | b'/')
}

fn is_qdtext(c: u8) -> bool {
    matches!(c, b'\t' | b' ' | 0x21 | 0x23..=0x5b | 0x5d..=0x7e | 0x80..=0xff)
}

fn is_quoted_pair_char(c: u8) -> bool {
    matches!(c, b'\t' | b' ' | 0x21..=0x7e | 0x80..=0xff)
}

fn is_ows(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// A position in an input string. Copying the cursor saves the position;
/// assigning the copy back restores it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(s: &'a str) -> Self {
        Self { s, pos: 0 }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }

    pub(crate) fn slice(&self, from: usize, to: usize) -> &'a str {
        &self.s[from..to]
    }

    pub(crate) fn is_end(&self) -> bool {
        self.pos == self.s.len()
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.pos).copied()
    }

    pub(crate) fn eat(&mut self, c: u8) -> bool {
        let matched = self.peek() == Some(c);
        if matched {
            self.pos += 1;
        }
        matched
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        self.pos - start
    }

    pub(crate) fn skip_ows(&mut self) {
        self.skip_while(is_ows);
    }

    pub(crate) fn skip_spaces(&mut self) -> usize {
        self.skip_while(|c| c == b' ')
    }

    pub(crate) fn skip_commas_and_ows(&mut self) {
        self.skip_while(|c| c == b',' || is_ows(c));
    }

    /// True if OWS followed by a comma or the end of input comes next. Does
    /// not move the cursor.
    pub(crate) fn at_boundary(&self) -> bool {
        let mut ahead = *self;
        ahead.skip_ows();
        ahead.is_end() || ahead.peek() == Some(b',')
    }

    pub(crate) fn token(&mut self) -> Option<&'a str> {
        let start = self.pos;
        match self.skip_while(is_tchar) {
            0 => None,
            _ => Some(&self.s[start..self.pos]),
        }
    }

    /// A token68 candidate: one or more token68 characters plus any `=`.
    pub(crate) fn token68(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if self.skip_while(is_token68_char) == 0 {
            return None;
        }
        self.skip_while(|c| c == b'=');
        Some(&self.s[start..self.pos])
    }

    /// Reads a quoted-string and returns its content.
    ///
    /// With `unescape` the quoted-pairs are resolved, allocating only when
    /// one is present. Without it the raw content is returned. On failure
    /// the cursor is left where it was.
    pub(crate) fn quoted_string(&mut self, unescape: bool) -> Option<Cow<'a, str>> {
        let bytes = self.s.as_bytes();
        if self.peek() != Some(b'"') {
            return None;
        }
        let start = self.pos + 1;
        let mut i = start;
        let mut escaped = false;
        loop {
            match *bytes.get(i)? {
                b'"' => break,
                b'\\' => {
                    if !is_quoted_pair_char(*bytes.get(i + 1)?) {
                        return None;
                    }
                    escaped = true;
                    i += 2;
                }
                c if is_qdtext(c) => i += 1,
                _ => return None,
            }
        }
        self.pos = i + 1;

        let raw = &self.s[start..i];
        if !(unescape && escaped) {
            return Some(Cow::Borrowed(raw));
        }
        let mut value = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(backslash) = rest.find('\\') {
            value.push_str(&rest[..backslash]);
            // the escaped character is copied with the next segment
            let escaped_char = &rest[backslash + 1..];
            let width = escaped_char.chars().next().map_or(0, char::len_utf8);
            value.push_str(&escaped_char[..width]);
            rest = &escaped_char[width..];
        }
        value.push_str(rest);
        Some(Cow::Owned(value))
    }

    /// One `auth-param` step: skips separators, reads `name = value`, and
    /// requires OWS then `,` or the end of input after the value.
    ///
    /// On failure the cursor is restored and `None` is returned.
    pub(crate) fn auth_param(&mut self, unescape: bool) -> Option<(&'a str, Cow<'a, str>)> {
        let saved = *self;
        let param = self.try_auth_param(unescape);
        if param.is_none() {
            *self = saved;
        }
        param
    }

    fn try_auth_param(&mut self, unescape: bool) -> Option<(&'a str, Cow<'a, str>)> {
        self.skip_commas_and_ows();
        let name = self.token()?;
        self.skip_ows();
        if !self.eat(b'=') {
            return None;
        }
        self.skip_ows();
        let value = if self.peek() == Some(b'"') { self.quoted_string(unescape)? } else { Cow::Borrowed(self.token()?) };
        self.at_boundary().then_some((name, value))
    }
}
