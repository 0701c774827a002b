//! Start line text kept alongside the fields.

use crate::fields::Fields;
use crate::protocol::Protocol;

/// Method and target of a request, or reason phrase of a response.
///
/// `target_or_reason` is empty or starts with one reserved space, so a
/// request line can emit `" " target` as one fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StartLine {
    method: String,
    target_or_reason: String,
}

impl StartLine {
    pub(crate) fn method(&self) -> &str {
        &self.method
    }

    pub(crate) fn set_method(&mut self, method: &str) {
        self.method.clear();
        self.method.push_str(method);
    }

    pub(crate) fn target_or_reason(&self) -> &str {
        self.target_or_reason.get(1..).unwrap_or("")
    }

    pub(crate) fn set_target_or_reason(&mut self, text: &str) {
        self.target_or_reason.clear();
        if !text.is_empty() {
            self.target_or_reason.reserve(text.len() + 1);
            self.target_or_reason.push(' ');
            self.target_or_reason.push_str(text);
        }
    }

    /// The target with its leading separator.
    pub(crate) fn spaced_target(&self) -> &str {
        if self.target_or_reason.is_empty() { " " } else { &self.target_or_reason }
    }
}

impl<P: Protocol> Fields<P> {
    /// Request method, `""` for a response.
    pub fn method(&self) -> &str {
        self.start_line.method()
    }

    /// Sets the request method. Accepts anything string-like, including
    /// `http::Method`.
    pub fn set_method<M: AsRef<str>>(&mut self, method: M) {
        self.start_line.set_method(method.as_ref());
    }

    /// Request target.
    pub fn target(&self) -> &str {
        self.start_line.target_or_reason()
    }

    pub fn set_target(&mut self, target: &str) {
        self.start_line.set_target_or_reason(target);
    }

    /// Explicit reason phrase, `""` when the protocol default is used.
    pub fn reason(&self) -> &str {
        self.start_line.target_or_reason()
    }

    /// Sets the reason phrase. An empty reason restores the protocol default.
    pub fn set_reason(&mut self, reason: &str) {
        self.start_line.set_target_or_reason(reason);
    }
}
