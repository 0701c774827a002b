//! Protocol policies and the shared vocabulary of the crate.
//!
//! This module provides the pieces every other module builds on:
//!
//! - **Policies** ([`policy`]): the [`Protocol`] trait and its three variants
//!   - [`Http`]: HTTP/1.0 and HTTP/1.1
//!   - [`SipStream`] ([`SipTcp`]): SIP over TCP, long-form names
//!   - [`SipDatagram`] ([`SipUdp`]): SIP over UDP, compact names on write
//!
//! - **Field names** ([`field`]): the [`Field`] table of known names
//!
//! - **Payload framing** ([`payload`]): [`PayloadSize`], derived from the
//!   framing fields of a header
//!
//! - **Errors** ([`error`]):
//!   - [`FieldError`]: store and derived-semantics failures
//!   - [`SendError`]: head encoding failures
//!
//! Policies are selected at compile time: a `Fields<SipDatagram>` and a
//! `Fields<Http>` are different types.

mod policy;
pub use policy::Http;
pub use policy::Protocol;
pub use policy::SipDatagram;
pub use policy::SipStream;
pub use policy::SipTcp;
pub use policy::SipUdp;

mod field;
pub use field::Field;

mod payload;
pub use payload::PayloadSize;

pub mod reason;

mod error;
pub use error::FieldError;
pub use error::SendError;
