//! Serialization of message heads.
//!
//! - [`WireView`]: a zero-copy [`bytes::Buf`] over the start line, the packed
//!   field lines and the terminating CRLF, for scatter-gather writes
//! - [`HeadEncoder`]: a `tokio_util` [`Encoder`](tokio_util::codec::Encoder)
//!   that copies a view into a `BytesMut`
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use micro_fields::codec::{HeadEncoder, MessageHead};
//! use micro_fields::fields::Fields;
//! use micro_fields::protocol::{Field, SipDatagram};
//! use tokio_util::codec::Encoder;
//!
//! let mut fields = Fields::<SipDatagram>::new();
//! fields.set_method("OPTIONS");
//! fields.set_target("sip:carol@chicago.example.com");
//! fields.insert(Field::CallId, "a84b4c76e66710").unwrap();
//!
//! let mut dst = BytesMut::new();
//! HeadEncoder::<SipDatagram>::new().encode((&fields, MessageHead::Request { version: 20 }), &mut dst).unwrap();
//! assert_eq!(&dst[..], b"OPTIONS sip:carol@chicago.example.com SIP/2.0\r\ni: a84b4c76e66710\r\n\r\n");
//! ```

mod head_encoder;
mod view;

pub use head_encoder::HeadEncoder;
pub use head_encoder::MessageHead;
pub use view::Fragments;
pub use view::WireView;
