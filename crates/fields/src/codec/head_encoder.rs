//! Head encoder for framed writers.
//!
//! [`HeadEncoder`] plugs a [`Fields`] store into a `tokio_util` framed sink:
//! it checks the version against the protocol, then copies the
//! [`WireView`](crate::codec::WireView) fragments into the destination
//! buffer.

use std::marker::PhantomData;

use bytes::{Buf, BufMut, BytesMut};
use http::StatusCode;
use tokio_util::codec::Encoder;
use tracing::error;

use crate::fields::Fields;
use crate::protocol::{Protocol, SendError};

/// What kind of start line to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageHead {
    Request { version: u8 },
    Response { version: u8, status: StatusCode },
}

impl MessageHead {
    pub fn version(&self) -> u8 {
        match self {
            MessageHead::Request { version } | MessageHead::Response { version, .. } => *version,
        }
    }
}

/// Encoder for message heads implementing the [`Encoder`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadEncoder<P: Protocol> {
    _protocol: PhantomData<P>,
}

impl<P: Protocol> HeadEncoder<P> {
    pub fn new() -> Self {
        Self { _protocol: PhantomData }
    }
}

impl<'a, P: Protocol> Encoder<(&'a Fields<P>, MessageHead)> for HeadEncoder<P> {
    type Error = SendError;

    /// # Errors
    ///
    /// Returns [`SendError::InvalidVersion`] if the protocol rejects the
    /// version of `head`.
    fn encode(&mut self, item: (&'a Fields<P>, MessageHead), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (fields, head) = item;

        let view = match head {
            MessageHead::Request { version } => fields.request_view(version),
            MessageHead::Response { version, status } => fields.response_view(version, status),
        };
        let view = view.inspect_err(|e| {
            error!(protocol = P::name(), version = head.version(), cause = %e, "unsupported protocol version");
        })?;
        dst.reserve(view.remaining());
        dst.put(view);
        Ok(())
    }
}
