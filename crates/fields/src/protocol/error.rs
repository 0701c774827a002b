use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldError {
    #[error("field {what} too long, current: {len} exceed the limit {max}")]
    TooLong { what: &'static str, len: usize, max: usize },

    #[error("field not found: {name}")]
    NotFound { name: String },

    #[error("invalid content-length field: {reason}")]
    InvalidContentLength { reason: String },

    #[error("body size {length} exceed the limit {limit}")]
    BodyTooLarge { length: u64, limit: u64 },
}

impl FieldError {
    pub fn name_too_long(len: usize, max: usize) -> Self {
        Self::TooLong { what: "name", len, max }
    }

    pub fn value_too_long(len: usize, max: usize) -> Self {
        Self::TooLong { what: "value", len, max }
    }

    pub fn not_found<S: ToString>(name: S) -> Self {
        Self::NotFound { name: name.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn body_too_large(length: u64, limit: u64) -> Self {
        Self::BodyTooLarge { length, limit }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid version {0} for the protocol")]
    InvalidVersion(u8),

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}
