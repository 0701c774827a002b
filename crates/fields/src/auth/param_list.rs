//! `auth-param` lists inside a challenge or credentials.

use std::borrow::Cow;

use tracing::trace;

use crate::auth::grammar::Cursor;

/// The `auth-param` list of a challenge or of credentials.
///
/// ```text
/// auth-param *( OWS "," [ OWS auth-param ] )
/// ```
///
/// Iteration stops at the first malformed parameter, as if the input ended
/// there. Use [`AuthParams::remainder`] to detect that case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthParamList<'a> {
    s: &'a str,
}

impl<'a> AuthParamList<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s }
    }

    /// The text this list parses.
    pub fn as_str(&self) -> &'a str {
        self.s
    }

    /// Returns true if the list text holds no parameter at all.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Starts a fresh iteration from the beginning of the text.
    pub fn iter(&self) -> AuthParams<'a> {
        AuthParams { cursor: Cursor::new(self.s), done: false }
    }

    /// The first parameter named `name`, compared case-insensitively.
    pub fn find(&self, name: &str) -> Option<AuthParam<'a>> {
        self.iter().find(|param| param.name.eq_ignore_ascii_case(name))
    }
}

impl<'a> IntoIterator for AuthParamList<'a> {
    type Item = AuthParam<'a>;
    type IntoIter = AuthParams<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &AuthParamList<'a> {
    type Item = AuthParam<'a>;
    type IntoIter = AuthParams<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One `name=value` parameter. Quoted values come back unquoted and
/// unescaped; the value borrows the input unless an escape was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthParam<'a> {
    name: &'a str,
    value: Cow<'a, str>,
}

impl<'a> AuthParam<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn into_value(self) -> Cow<'a, str> {
        self.value
    }
}

/// Iterator over an [`AuthParamList`].
#[derive(Debug, Clone)]
pub struct AuthParams<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> AuthParams<'a> {
    /// Text not consumed yet. Once the iteration is over this is empty for
    /// well-formed input and the malformed tail otherwise.
    pub fn remainder(&self) -> &'a str {
        self.cursor.rest()
    }
}

impl<'a> Iterator for AuthParams<'a> {
    type Item = AuthParam<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some((name, value)) = self.cursor.auth_param(true) {
            return Some(AuthParam { name, value });
        }

        self.done = true;
        self.cursor.skip_commas_and_ows();
        if !self.cursor.is_end() {
            trace!(rest = self.cursor.rest(), "auth-param list truncated");
        }
        None
    }
}
