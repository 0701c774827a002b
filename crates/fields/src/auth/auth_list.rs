//! Challenge and credentials lists of the authentication fields.

use tracing::trace;

use crate::auth::grammar::Cursor;
use crate::auth::AuthParamList;

/// A list of challenges (`WWW-Authenticate`, `Proxy-Authenticate`) or the
/// credentials of an `Authorization` field.
///
/// ```text
/// WWW-Authenticate = *( "," OWS ) challenge *( OWS "," [ OWS challenge ] )
/// challenge        = auth-scheme [ 1*SP ( token68 / [ ( "," / auth-param )
///                    *( OWS "," [ OWS auth-param ] ) ] ) ]
/// ```
///
/// Iteration stops at the first malformed challenge, as if the input ended
/// there.
///
/// ```
/// use micro_fields::auth::AuthList;
///
/// let list = AuthList::new(r#"Basic realm="WallyWorld""#);
/// let challenge = list.iter().next().unwrap();
/// assert_eq!(challenge.scheme(), "Basic");
/// assert_eq!(challenge.params().find("realm").unwrap().value(), "WallyWorld");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthList<'a> {
    s: &'a str,
}

impl<'a> AuthList<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s }
    }

    pub fn as_str(&self) -> &'a str {
        self.s
    }

    /// Starts a fresh iteration from the beginning of the text.
    pub fn iter(&self) -> Challenges<'a> {
        Challenges { cursor: Cursor::new(self.s), done: false }
    }

    /// The first challenge with the given scheme, compared case-insensitively.
    pub fn find(&self, scheme: &str) -> Option<Challenge<'a>> {
        self.iter().find(|challenge| challenge.scheme.eq_ignore_ascii_case(scheme))
    }

    pub fn exists(&self, scheme: &str) -> bool {
        self.find(scheme).is_some()
    }
}

impl<'a> IntoIterator for AuthList<'a> {
    type Item = Challenge<'a>;
    type IntoIter = Challenges<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &AuthList<'a> {
    type Item = Challenge<'a>;
    type IntoIter = Challenges<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One challenge or set of credentials: a scheme followed by either a
/// token68 or a parameter list. Both may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge<'a> {
    scheme: &'a str,
    token68: &'a str,
    params: AuthParamList<'a>,
}

impl<'a> Challenge<'a> {
    fn bare(scheme: &'a str) -> Self {
        Self { scheme, token68: "", params: AuthParamList::default() }
    }

    pub fn scheme(&self) -> &'a str {
        self.scheme
    }

    /// The token68 form, `""` when the challenge uses parameters.
    pub fn token68(&self) -> &'a str {
        self.token68
    }

    pub fn params(&self) -> AuthParamList<'a> {
        self.params
    }
}

/// Iterator over an [`AuthList`].
#[derive(Debug, Clone)]
pub struct Challenges<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> Challenges<'a> {
    /// Text not consumed yet. Once the iteration is over this is empty for
    /// well-formed input and the malformed tail otherwise.
    pub fn remainder(&self) -> &'a str {
        self.cursor.rest()
    }

    fn step(&mut self) -> Option<Challenge<'a>> {
        let cursor = &mut self.cursor;
        cursor.skip_commas_and_ows();
        let scheme = cursor.token()?;
        if cursor.is_end() || cursor.peek() == Some(b',') {
            return Some(Challenge::bare(scheme));
        }
        if cursor.skip_spaces() == 0 {
            return None;
        }

        let after_spaces = *cursor;
        if let Some(token68) = cursor.token68()
            && cursor.at_boundary()
        {
            return Some(Challenge { token68, ..Challenge::bare(scheme) });
        }

        // not a token68, so the rest is a parameter list; measure it
        *cursor = after_spaces;
        let start = cursor.pos();
        let mut end = start;
        while cursor.auth_param(false).is_some() {
            end = cursor.pos();
        }
        if end == start {
            return cursor.at_boundary().then(|| Challenge::bare(scheme));
        }
        Some(Challenge { params: AuthParamList::new(cursor.slice(start, end)), ..Challenge::bare(scheme) })
    }
}

impl<'a> Iterator for Challenges<'a> {
    type Item = Challenge<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let saved = self.cursor;
        if let Some(challenge) = self.step() {
            return Some(challenge);
        }

        self.done = true;
        self.cursor = saved;
        self.cursor.skip_commas_and_ows();
        if !self.cursor.is_end() {
            trace!(rest = self.cursor.rest(), "auth list truncated");
        }
        None
    }
}
