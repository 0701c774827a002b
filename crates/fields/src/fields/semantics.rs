//! Message semantics derived from the framing and connection fields.
//!
//! These helpers only read and rewrite `Transfer-Encoding`, `Connection` and
//! `Content-Length` through the regular store operations. Each setter is
//! idempotent and never duplicates a token; a list that ends up empty is
//! erased rather than left as an empty field.

use tracing::trace;

use crate::ensure;
use crate::fields::entry::FieldEntry;
use crate::fields::{Fields, token_list};
use crate::protocol::{Field, FieldError, PayloadSize, Protocol};

const CHUNKED: &str = "chunked";
const CLOSE: &str = "close";
const KEEP_ALIVE: &str = "keep-alive";

impl<P: Protocol> Fields<P> {
    /// Returns true if the last transfer coding is `chunked`.
    pub fn chunked(&self) -> bool {
        self.find(Field::TransferEncoding).is_some_and(|entry| token_list::last_is(entry.value(), CHUNKED))
    }

    /// Adds or removes a trailing `chunked` transfer coding.
    ///
    /// Enabling appends `chunked` unless it is already last. Disabling removes
    /// only a trailing `chunked` and keeps the other codings in order.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TooLong`] if the rewritten value does not fit.
    pub fn set_chunked(&mut self, chunked: bool) -> Result<(), FieldError> {
        let current = self.find(Field::TransferEncoding).map(FieldEntry::value);
        let updated = match current {
            Some(value) if token_list::last_is(value, CHUNKED) => {
                if chunked {
                    return Ok(());
                }
                token_list::without_last(value)
            }
            Some(value) if chunked => {
                let mut list = token_list::without(value, &[]);
                token_list::append(&mut list, CHUNKED);
                list
            }
            None if chunked => CHUNKED.to_owned(),
            _ => return Ok(()),
        };
        self.rewrite(Field::TransferEncoding, &updated)
    }

    /// Returns whether the connection stays open after this message.
    ///
    /// With [`Protocol::use_http11_keepalive`] the connection persists unless
    /// `close` is listed; otherwise `keep-alive` must be listed.
    pub fn keep_alive(&self, version: u8) -> bool {
        let connection = self.find(Field::Connection).map(FieldEntry::value);
        if P::use_http11_keepalive(version) {
            !connection.is_some_and(|value| token_list::contains(value, CLOSE))
        } else {
            connection.is_some_and(|value| token_list::contains(value, KEEP_ALIVE))
        }
    }

    /// Edits the `Connection` tokens so that [`keep_alive`](Self::keep_alive)
    /// returns `keep_alive`, using only the tokens the version needs.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TooLong`] if the rewritten value does not fit.
    pub fn set_keep_alive(&mut self, version: u8, keep_alive: bool) -> Result<(), FieldError> {
        let current = self.find(Field::Connection).map_or("", FieldEntry::value);
        let updated = match (P::use_http11_keepalive(version), keep_alive) {
            (false, true) => {
                let mut list = token_list::without(current, &[CLOSE]);
                if !token_list::contains(&list, KEEP_ALIVE) {
                    token_list::append(&mut list, KEEP_ALIVE);
                }
                list
            }
            (false, false) | (true, true) => token_list::without(current, &[CLOSE, KEEP_ALIVE]),
            (true, false) => {
                let mut list = token_list::without(current, &[KEEP_ALIVE]);
                if !token_list::contains(&list, CLOSE) {
                    token_list::append(&mut list, CLOSE);
                }
                list
            }
        };
        trace!(version, keep_alive, connection = updated.as_str(), "update connection tokens");
        self.rewrite(Field::Connection, &updated)
    }

    /// Parses `Content-Length`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidContentLength`] if the value is not a
    /// decimal `u64`.
    pub fn content_length(&self) -> Result<Option<u64>, FieldError> {
        let Some(entry) = self.find(Field::ContentLength) else {
            return Ok(None);
        };
        let value = entry.value();
        value.parse::<u64>().map(Some).map_err(|e| FieldError::invalid_content_length(format!("value {value} is not u64: {e}")))
    }

    /// Sets `Content-Length` to `length`, or erases it for `None`.
    ///
    /// # Errors
    ///
    /// Never fails for the decimal text of a `u64`; the signature follows
    /// [`set`](Self::set).
    pub fn set_content_length(&mut self, length: Option<u64>) -> Result<(), FieldError> {
        match length {
            Some(length) => self.rewrite(Field::ContentLength, &length.to_string()),
            None => {
                self.erase(Field::ContentLength);
                Ok(())
            }
        }
    }

    /// Works out how the body of a received message is delimited.
    ///
    /// refer: RFC 9112 section 6.3 and RFC 3261 sections 18.3 and 20.14
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidContentLength`] if both chunked coding and
    /// a length are present, if the length is malformed, or if the protocol
    /// requires a length that is missing. Returns
    /// [`FieldError::BodyTooLarge`] above [`Protocol::default_body_limit`].
    pub fn payload_size(&self, version: u8, is_request: bool) -> Result<PayloadSize, FieldError> {
        let chunked = self.chunked() && (P::allow_chunked(version) || P::accept_chunked());
        let length = self.content_length()?;

        match (chunked, length) {
            (true, Some(_)) => Err(FieldError::invalid_content_length("transfer_encoding and content_length both present in fields")),
            (true, None) => Ok(PayloadSize::Chunked),
            (false, Some(length)) => {
                let limit = P::default_body_limit(is_request);
                ensure!(length <= limit, FieldError::body_too_large(length, limit));
                Ok(PayloadSize::Length(length))
            }
            (false, None) => {
                ensure!(!P::content_length_required(), FieldError::invalid_content_length("missing, the transport requires it"));
                Ok(P::unframed_body(is_request))
            }
        }
    }

    /// Sets the framing fields for an outgoing body.
    ///
    /// A known length always becomes `Content-Length`. An unknown length uses
    /// chunked coding where the protocol allows it and is otherwise left to
    /// the transport boundary. Returns the framing that was chosen.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidContentLength`] for an unknown length on a
    /// transport that requires `Content-Length`.
    pub fn prepare_payload(&mut self, version: u8, body_len: Option<u64>) -> Result<PayloadSize, FieldError> {
        match body_len {
            Some(length) => {
                self.set_chunked(false)?;
                self.set_content_length(Some(length))?;
                Ok(PayloadSize::Length(length))
            }
            None if P::allow_chunked(version) => {
                self.set_content_length(None)?;
                self.set_chunked(true)?;
                Ok(PayloadSize::Chunked)
            }
            None => {
                ensure!(!P::content_length_required(), FieldError::invalid_content_length("body length must be known for this transport"));
                self.set_chunked(false)?;
                self.set_content_length(None)?;
                Ok(PayloadSize::UntilEof)
            }
        }
    }

    /// Replaces `field` with `value`, or erases it for an empty value. A single
    /// entry that already holds `value` is left in place.
    fn rewrite(&mut self, field: Field, value: &str) -> Result<(), FieldError> {
        if value.is_empty() {
            self.erase(field);
            return Ok(());
        }
        if self.count(field) == 1 && self.find(field).map(FieldEntry::value) == Some(value) {
            return Ok(());
        }
        self.set(field, value).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use crate::fields::Fields;
    use crate::protocol::{Field, FieldError, Http, PayloadSize, SipDatagram, SipStream};

    #[test]
    fn chunked_is_idempotent() {
        let mut fields = Fields::<Http>::new();
        assert!(!fields.chunked());

        fields.set_chunked(true).unwrap();
        fields.set_chunked(true).unwrap();
        assert_eq!(fields.get(Field::TransferEncoding), "chunked");
        assert_eq!(fields.count(Field::TransferEncoding), 1);
        assert!(fields.chunked());

        fields.set_chunked(false).unwrap();
        assert!(!fields.contains(Field::TransferEncoding));
        assert!(!fields.chunked());
    }

    #[test]
    fn chunked_appends_after_other_codings() {
        let mut fields = Fields::<Http>::new();
        fields.set(Field::TransferEncoding, "gzip").unwrap();
        fields.set_chunked(true).unwrap();
        assert_eq!(fields.get(Field::TransferEncoding), "gzip, chunked");

        fields.set_chunked(false).unwrap();
        assert_eq!(fields.get(Field::TransferEncoding), "gzip");
    }

    #[test]
    fn chunked_only_counts_when_last() {
        let mut fields = Fields::<Http>::new();
        fields.set("Transfer-Encoding", "chunked, gzip").unwrap();
        assert!(!fields.chunked());

        // not trailing, so nothing to remove
        fields.set_chunked(false).unwrap();
        assert_eq!(fields.get(Field::TransferEncoding), "chunked, gzip");

        fields.set_chunked(true).unwrap();
        assert_eq!(fields.get(Field::TransferEncoding), "chunked, gzip, chunked");
        assert!(fields.chunked());
    }

    #[test]
    fn keep_alive_http10() {
        let mut fields = Fields::<Http>::new();
        assert!(!fields.keep_alive(10));

        fields.set_keep_alive(10, true).unwrap();
        assert_eq!(fields.get(Field::Connection), "keep-alive");
        assert!(fields.keep_alive(10));

        fields.set_keep_alive(10, true).unwrap();
        assert_eq!(fields.get(Field::Connection), "keep-alive");

        fields.set_keep_alive(10, false).unwrap();
        assert!(!fields.contains(Field::Connection));
        assert!(!fields.keep_alive(10));
    }

    #[test]
    fn keep_alive_http10_removes_close_keeps_other_tokens() {
        let mut fields = Fields::<Http>::new();
        fields.set(Field::Connection, "close, upgrade").unwrap();
        fields.set_keep_alive(10, true).unwrap();
        assert_eq!(fields.get(Field::Connection), "upgrade, keep-alive");

        fields.set_keep_alive(10, false).unwrap();
        assert_eq!(fields.get(Field::Connection), "upgrade");
    }

    #[test]
    fn keep_alive_http11() {
        let mut fields = Fields::<Http>::new();
        assert!(fields.keep_alive(11));

        fields.set_keep_alive(11, false).unwrap();
        assert_eq!(fields.get(Field::Connection), "close");
        assert!(!fields.keep_alive(11));

        fields.set_keep_alive(11, false).unwrap();
        assert_eq!(fields.get(Field::Connection), "close");

        fields.set_keep_alive(11, true).unwrap();
        assert!(!fields.contains(Field::Connection));
        assert!(fields.keep_alive(11));
    }

    #[test]
    fn unchanged_value_keeps_its_position() {
        let mut fields = Fields::<Http>::new();
        fields.insert(Field::Connection, "close").unwrap();
        fields.insert(Field::ContentLength, "42").unwrap();
        fields.insert(Field::Host, "example.com").unwrap();

        fields.set_keep_alive(11, false).unwrap();
        fields.set_content_length(Some(42)).unwrap();
        let names: Vec<&str> = fields.iter().map(|entry| entry.name()).collect();
        assert_eq!(names, vec!["Connection", "Content-Length", "Host"]);

        // normalizing the token list is a change
        fields.set(Field::Connection, "close,upgrade").unwrap();
        fields.insert(Field::Accept, "*/*").unwrap();
        fields.set_keep_alive(11, false).unwrap();
        assert_eq!(fields.get(Field::Connection), "close, upgrade");
        let names: Vec<&str> = fields.iter().map(|entry| entry.name()).collect();
        assert_eq!(names, vec!["Content-Length", "Host", "Accept", "Connection"]);
    }

    #[test]
    fn keep_alive_http11_drops_keep_alive_token() {
        let mut fields = Fields::<Http>::new();
        fields.set(Field::Connection, "keep-alive, Upgrade").unwrap();
        fields.set_keep_alive(11, false).unwrap();
        assert_eq!(fields.get(Field::Connection), "Upgrade, close");
    }

    #[test]
    fn keep_alive_follows_the_policy() {
        let mut stream = Fields::<SipStream>::new();
        assert!(stream.keep_alive(20));
        stream.set_keep_alive(20, false).unwrap();
        assert_eq!(stream.get(Field::Connection), "close");

        let datagram = Fields::<SipDatagram>::new();
        assert!(!datagram.keep_alive(20));
    }

    #[test]
    fn content_length() {
        let mut fields = Fields::<Http>::new();
        assert_eq!(fields.content_length().unwrap(), None);

        fields.set_content_length(Some(42)).unwrap();
        assert_eq!(fields.get(Field::ContentLength), "42");
        assert_eq!(fields.content_length().unwrap(), Some(42));

        fields.set_content_length(None).unwrap();
        assert!(!fields.contains(Field::ContentLength));

        fields.set(Field::ContentLength, "4x").unwrap();
        assert!(matches!(fields.content_length(), Err(FieldError::InvalidContentLength { .. })));
    }

    #[test]
    fn content_length_on_datagram_uses_compact_name() {
        let mut fields = Fields::<SipDatagram>::new();
        fields.set_content_length(Some(0)).unwrap();
        assert_eq!(fields.find(Field::ContentLength).unwrap().name(), "l");
    }

    #[test]
    fn payload_size_http() {
        let mut fields = Fields::<Http>::new();
        assert_eq!(fields.payload_size(11, true).unwrap(), PayloadSize::Empty);
        assert_eq!(fields.payload_size(11, false).unwrap(), PayloadSize::UntilEof);

        fields.set_chunked(true).unwrap();
        assert_eq!(fields.payload_size(11, true).unwrap(), PayloadSize::Chunked);
        // HTTP/1.0 knows no chunked coding
        assert_eq!(fields.payload_size(10, true).unwrap(), PayloadSize::Empty);

        fields.set_content_length(Some(5)).unwrap();
        assert!(matches!(fields.payload_size(11, true), Err(FieldError::InvalidContentLength { .. })));

        fields.set_chunked(false).unwrap();
        assert_eq!(fields.payload_size(11, true).unwrap(), PayloadSize::Length(5));

        fields.set_content_length(Some(2 * 1024 * 1024)).unwrap();
        assert!(matches!(fields.payload_size(11, true), Err(FieldError::BodyTooLarge { .. })));
        assert_eq!(fields.payload_size(11, false).unwrap(), PayloadSize::Length(2 * 1024 * 1024));
    }

    #[test]
    fn payload_size_sip() {
        let stream = Fields::<SipStream>::new();
        assert!(matches!(stream.payload_size(20, true), Err(FieldError::InvalidContentLength { .. })));

        let mut datagram = Fields::<SipDatagram>::new();
        assert_eq!(datagram.payload_size(20, true).unwrap(), PayloadSize::UntilEof);
        datagram.insert("l", "70000").unwrap();
        assert!(matches!(datagram.payload_size(20, false), Err(FieldError::BodyTooLarge { length: 70000, limit: 65335 })));
    }

    #[test]
    fn prepare_payload() {
        let mut fields = Fields::<Http>::new();
        assert_eq!(fields.prepare_payload(11, None).unwrap(), PayloadSize::Chunked);
        assert!(fields.chunked());

        assert_eq!(fields.prepare_payload(11, Some(12)).unwrap(), PayloadSize::Length(12));
        assert!(!fields.contains(Field::TransferEncoding));
        assert_eq!(fields.get(Field::ContentLength), "12");

        assert_eq!(fields.prepare_payload(10, None).unwrap(), PayloadSize::UntilEof);
        assert!(!fields.contains(Field::ContentLength));

        let mut stream = Fields::<SipStream>::new();
        assert!(stream.prepare_payload(20, None).is_err());
        assert_eq!(stream.prepare_payload(20, Some(0)).unwrap(), PayloadSize::Length(0));
        assert_eq!(stream.get(Field::ContentLength), "0");
    }
}
