//! Header fields for HTTP/1.x and SIP/2.0 messages
//!
//! This crate provides the header side of a message: an ordered,
//! multi-valued field store with case-insensitive lookup, a zero-copy
//! serialization of the message head for scatter-gather writes, and parsers
//! for the RFC 7235 authentication grammar. The same store serves HTTP and
//! SIP; the differences between them are captured by a protocol policy
//! chosen at compile time.
//!
//! # Features
//!
//! - Insertion order preserved, with duplicates of one name kept adjacent
//! - Stable entry handles that never resolve after the entry is removed
//! - SIP compact names (`v`, `i`, `l`, ...) resolved on read and written
//!   on datagram transports
//! - `Transfer-Encoding`, `Connection` and `Content-Length` helpers that
//!   never duplicate tokens
//! - A [`bytes::Buf`] over the head that borrows every field line
//! - Forgiving `WWW-Authenticate` / `Authorization` parsing
//!
//! # Example
//!
//! ```
//! use bytes::Buf;
//! use micro_fields::fields::Fields;
//! use micro_fields::protocol::{Field, SipUdp};
//!
//! let mut fields = Fields::<SipUdp>::new();
//! fields.set_method("INVITE");
//! fields.set_target("sip:bob@biloxi.example.com");
//! fields.insert(Field::Via, "SIP/2.0/UDP pc33.atlanta.example.com").unwrap();
//! fields.insert(Field::CallId, "a84b4c76e66710").unwrap();
//! fields.set_content_length(Some(0)).unwrap();
//!
//! // compact and long forms name the same field
//! assert_eq!(fields.get("Call-ID"), "a84b4c76e66710");
//! assert_eq!(fields.get("i"), "a84b4c76e66710");
//!
//! let mut view = fields.request_view(20).unwrap();
//! let head = view.copy_to_bytes(view.remaining());
//! assert!(head.starts_with(b"INVITE sip:bob@biloxi.example.com SIP/2.0\r\nv: SIP/2.0/UDP"));
//! assert!(head.ends_with(b"l: 0\r\n\r\n"));
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: the [`Protocol`](protocol::Protocol) policies, known
//!   field names, payload framing and error types
//! - [`fields`]: the [`Fields`](fields::Fields) store and derived semantics
//! - [`codec`]: [`WireView`](codec::WireView) and the `tokio_util` head
//!   encoder
//! - [`auth`]: RFC 7235 challenge and credentials parsers
//!
//! # Limitations
//!
//! - Names and values are limited to 65535 bytes each
//! - No obsolete line folding on input or output
//! - Parsing of the message stream itself is left to the caller

pub mod auth;
pub mod codec;
pub mod fields;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
