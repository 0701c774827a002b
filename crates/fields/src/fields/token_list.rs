//! Minimal comma separated token list handling for `Connection` and
//! `Transfer-Encoding` values.

use crate::fields::entry::trim_ows;

/// Non-empty list elements with surrounding OWS removed.
pub(crate) fn tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(trim_ows).filter(|token| !token.is_empty())
}

pub(crate) fn contains(value: &str, token: &str) -> bool {
    tokens(value).any(|t| t.eq_ignore_ascii_case(token))
}

pub(crate) fn last_is(value: &str, token: &str) -> bool {
    tokens(value).last().is_some_and(|t| t.eq_ignore_ascii_case(token))
}

/// Rebuilds the list without any of `remove`, joined by `", "`.
pub(crate) fn without(value: &str, remove: &[&str]) -> String {
    join(tokens(value).filter(|t| !remove.iter().any(|r| t.eq_ignore_ascii_case(r))))
}

/// Rebuilds the list without its last element.
pub(crate) fn without_last(value: &str) -> String {
    let count = tokens(value).count();
    join(tokens(value).take(count.saturating_sub(1)))
}

/// Appends `token` to a list that may be empty.
pub(crate) fn append(list: &mut String, token: &str) {
    if !list.is_empty() {
        list.push_str(", ");
    }
    list.push_str(token);
}

fn join<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    let mut list = String::new();
    for token in tokens {
        append(&mut list, token);
    }
    list
}
