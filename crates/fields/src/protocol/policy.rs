//! Protocol policies.
//!
//! A policy is a zero-sized marker type implementing [`Protocol`]. The field
//! store and the wire view take the policy as a type parameter, so the choice
//! between HTTP, SIP over a stream transport and SIP over a datagram transport
//! is made once, when the store is constructed, and costs nothing at runtime.
//!
//! Versions are encoded as `major * 10 + minor`: `11` is `HTTP/1.1`, `20` is
//! `SIP/2.0`.

use std::fmt::Debug;

use crate::protocol::reason;
use crate::protocol::{Field, PayloadSize};

/// The capability set each protocol variant provides.
pub trait Protocol: Debug + Default + Clone + Copy + Send + Sync + 'static {
    /// Label used in the start line, e.g. `HTTP` or `SIP`.
    fn name() -> &'static str;

    /// Returns true if `version` is valid for this protocol.
    fn check_version(version: u8) -> bool;

    fn default_version() -> u8;

    /// Selects `Connection` semantics: true means keep-alive is the default
    /// and `close` opts out, false means `keep-alive` must opt in.
    fn use_http11_keepalive(version: u8) -> bool;

    /// Whether chunked transfer coding may be produced for `version`.
    fn allow_chunked(version: u8) -> bool;

    /// Whether chunked transfer coding is honoured even when
    /// [`allow_chunked`](Protocol::allow_chunked) is false.
    fn accept_chunked() -> bool;

    /// Wire form of a known field.
    fn field_to_compact(field: Field) -> &'static str {
        field.as_str()
    }

    /// Wire form of a field given by name. Unknown names pass through.
    fn name_to_compact(name: &str) -> &str {
        match Self::string_to_field(name) {
            Field::Unknown => name,
            field => Self::field_to_compact(field),
        }
    }

    /// Resolves a wire name to a known field.
    fn string_to_field(name: &str) -> Field {
        Field::from_name(name)
    }

    /// Stream transports need an explicit `Content-Length`.
    fn content_length_required() -> bool;

    fn override_content_length() -> bool;

    /// Framing of a body announced by neither `Content-Length` nor chunked
    /// transfer coding.
    fn unframed_body(is_request: bool) -> PayloadSize;

    /// Default body size cap for requests (`true`) or responses (`false`).
    fn default_body_limit(is_request: bool) -> u64;

    /// Reason phrase used for a response without an explicit reason.
    fn default_reason(status: u16) -> &'static str;
}

/// HTTP/1.0 and HTTP/1.1.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Http;

impl Protocol for Http {
    fn name() -> &'static str {
        "HTTP"
    }

    fn check_version(version: u8) -> bool {
        (10..=11).contains(&version)
    }

    fn default_version() -> u8 {
        11
    }

    fn use_http11_keepalive(version: u8) -> bool {
        version >= 11
    }

    fn allow_chunked(version: u8) -> bool {
        version >= 11
    }

    fn accept_chunked() -> bool {
        false
    }

    fn content_length_required() -> bool {
        false
    }

    fn override_content_length() -> bool {
        false
    }

    // a response without framing runs until the connection closes
    fn unframed_body(is_request: bool) -> PayloadSize {
        if is_request { PayloadSize::Empty } else { PayloadSize::UntilEof }
    }

    fn default_body_limit(is_request: bool) -> u64 {
        if is_request { 1024 * 1024 } else { 8 * 1024 * 1024 }
    }

    fn default_reason(status: u16) -> &'static str {
        reason::http_reason(status)
    }
}

/// Maps a single-letter name to its field, RFC 3261 section 20.
fn sip_compact_to_field(name: &str) -> Option<Field> {
    let &[letter] = name.as_bytes() else {
        return None;
    };
    let field = match letter.to_ascii_lowercase() {
        b'i' => Field::CallId,
        b'm' => Field::Contact,
        b'e' => Field::ContentEncoding,
        b'l' => Field::ContentLength,
        b'c' => Field::ContentType,
        b'f' => Field::From,
        b's' => Field::Subject,
        b'k' => Field::Supported,
        b't' => Field::To,
        b'v' => Field::Via,
        _ => return None,
    };
    Some(field)
}

fn sip_string_to_field(name: &str) -> Field {
    sip_compact_to_field(name).unwrap_or_else(|| Field::from_name(name))
}

/// SIP/2.0 over a stream transport such as TCP.
///
/// Long-form names on write, both forms on read. `Content-Length` is mandatory
/// on streams (RFC 3261 section 20.14).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SipStream;

impl Protocol for SipStream {
    fn name() -> &'static str {
        "SIP"
    }

    fn check_version(version: u8) -> bool {
        version == 20
    }

    fn default_version() -> u8 {
        20
    }

    fn use_http11_keepalive(_version: u8) -> bool {
        true
    }

    // RFC 3261 section 7.4.2: chunked MUST NOT be used for SIP
    fn allow_chunked(_version: u8) -> bool {
        false
    }

    fn accept_chunked() -> bool {
        false
    }

    fn string_to_field(name: &str) -> Field {
        sip_string_to_field(name)
    }

    fn content_length_required() -> bool {
        true
    }

    fn override_content_length() -> bool {
        false
    }

    fn unframed_body(_is_request: bool) -> PayloadSize {
        PayloadSize::Empty
    }

    fn default_body_limit(_is_request: bool) -> u64 {
        1024 * 1024
    }

    fn default_reason(status: u16) -> &'static str {
        reason::sip_reason(status)
    }
}

/// SIP/2.0 over a datagram transport such as UDP.
///
/// Compact names on write. Without `Content-Length` the body runs to the end
/// of the datagram (RFC 3261 section 18.3).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SipDatagram;

impl Protocol for SipDatagram {
    fn name() -> &'static str {
        "SIP"
    }

    fn check_version(version: u8) -> bool {
        version == 20
    }

    fn default_version() -> u8 {
        20
    }

    fn use_http11_keepalive(_version: u8) -> bool {
        false
    }

    fn allow_chunked(_version: u8) -> bool {
        false
    }

    fn accept_chunked() -> bool {
        false
    }

    fn field_to_compact(field: Field) -> &'static str {
        match field {
            Field::CallId => "i",
            Field::Contact => "m",
            Field::ContentEncoding => "e",
            Field::ContentLength => "l",
            Field::ContentType => "c",
            Field::From => "f",
            Field::Subject => "s",
            Field::Supported => "k",
            Field::To => "t",
            Field::Via => "v",
            field => field.as_str(),
        }
    }

    fn string_to_field(name: &str) -> Field {
        sip_string_to_field(name)
    }

    fn content_length_required() -> bool {
        false
    }

    fn override_content_length() -> bool {
        false
    }

    fn unframed_body(_is_request: bool) -> PayloadSize {
        PayloadSize::UntilEof
    }

    // 65535 is the largest UDP datagram including IP and UDP headers;
    // 200 bytes stay reserved for them (RFC 3261 section 18.1.1)
    fn default_body_limit(_is_request: bool) -> u64 {
        65535 - 200
    }

    fn default_reason(status: u16) -> &'static str {
        reason::sip_reason(status)
    }
}

/// SIP over TCP.
pub type SipTcp = SipStream;

/// SIP over UDP.
pub type SipUdp = SipDatagram;

#[cfg(test)]
mod tests {
    use super::*;

    const COMPACT: &[(&str, Field)] = &[
        ("i", Field::CallId),
        ("m", Field::Contact),
        ("e", Field::ContentEncoding),
        ("l", Field::ContentLength),
        ("c", Field::ContentType),
        ("f", Field::From),
        ("s", Field::Subject),
        ("k", Field::Supported),
        ("t", Field::To),
        ("v", Field::Via),
    ];

    #[test]
    fn http_policy() {
        assert_eq!(Http::name(), "HTTP");
        assert!(Http::check_version(10));
        assert!(Http::check_version(11));
        assert!(!Http::check_version(20));
        assert!(!Http::use_http11_keepalive(10));
        assert!(Http::use_http11_keepalive(11));
        assert!(!Http::allow_chunked(10));
        assert!(Http::allow_chunked(11));
        assert_eq!(Http::default_body_limit(true), 1024 * 1024);
        assert_eq!(Http::default_body_limit(false), 8 * 1024 * 1024);
        assert_eq!(Http::string_to_field("v"), Field::Unknown);
        assert_eq!(Http::field_to_compact(Field::Via), "Via");
        assert_eq!(Http::default_reason(404), "Not Found");
        assert_eq!(Http::unframed_body(true), PayloadSize::Empty);
        assert_eq!(Http::unframed_body(false), PayloadSize::UntilEof);
    }

    #[test]
    fn sip_stream_policy() {
        assert_eq!(SipStream::name(), "SIP");
        assert!(SipStream::check_version(20));
        assert!(!SipStream::check_version(11));
        assert!(SipStream::use_http11_keepalive(20));
        assert!(!SipStream::allow_chunked(20));
        assert!(SipStream::content_length_required());
        assert_eq!(SipStream::default_body_limit(true), 1024 * 1024);
        assert_eq!(SipStream::default_body_limit(false), 1024 * 1024);
        assert_eq!(SipStream::field_to_compact(Field::ContentLength), "Content-Length");
        assert_eq!(SipStream::name_to_compact("l"), "Content-Length");
        assert_eq!(SipStream::default_reason(180), "Ringing");
    }

    #[test]
    fn sip_datagram_policy() {
        assert!(!SipDatagram::use_http11_keepalive(20));
        assert!(!SipDatagram::content_length_required());
        assert!(!SipDatagram::override_content_length());
        assert_eq!(SipDatagram::default_body_limit(true), 65335);
        assert_eq!(SipDatagram::default_body_limit(false), 65335);
        assert_eq!(SipDatagram::unframed_body(true), PayloadSize::UntilEof);
        assert_eq!(SipDatagram::name_to_compact("Content-Length"), "l");
        assert_eq!(SipDatagram::name_to_compact("X-Custom"), "X-Custom");
        assert_eq!(SipDatagram::name_to_compact("CSeq"), "CSeq");
    }

    #[test]
    fn compact_forms_round_trip() {
        for &(letter, field) in COMPACT {
            assert_eq!(SipDatagram::string_to_field(letter), field);
            assert_eq!(SipDatagram::string_to_field(&letter.to_ascii_uppercase()), field);
            assert_eq!(SipStream::string_to_field(letter), field);
            assert_eq!(SipDatagram::field_to_compact(field), letter);
            assert_eq!(SipDatagram::string_to_field(field.as_str()), field);
        }
        assert_eq!(SipDatagram::string_to_field("x"), Field::Unknown);
    }
}
