//! A single header field, stored as the exact line that goes on the wire.

use std::fmt;

use crate::protocol::{Field, FieldError};

/// Maximum length in bytes of a field name
pub const MAX_NAME_LEN: usize = u16::MAX as usize;

/// Maximum length in bytes of a field value
pub const MAX_VALUE_LEN: usize = u16::MAX as usize;

/// One header field owned by a [`Fields`](crate::fields::Fields) store.
///
/// Name and value live in one packed line `name ": " value "\r\n"`, so the
/// wire view can hand the line out as a single fragment without formatting.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FieldEntry {
    field: Field,
    line: Box<str>,
    name_len: u16,
    value_len: u16,
}

impl FieldEntry {
    /// Builds the packed line. The value is trimmed of surrounding OWS.
    pub(crate) fn new(field: Field, name: &str, value: &str) -> Result<Self, FieldError> {
        let value = trim_ows(value);
        let Ok(name_len) = u16::try_from(name.len()) else {
            return Err(FieldError::name_too_long(name.len(), MAX_NAME_LEN));
        };
        let Ok(value_len) = u16::try_from(value.len()) else {
            return Err(FieldError::value_too_long(value.len(), MAX_VALUE_LEN));
        };

        let mut line = String::with_capacity(name.len() + value.len() + 4);
        line.push_str(name);
        line.push_str(": ");
        line.push_str(value);
        line.push_str("\r\n");

        Ok(Self { field, line: line.into_boxed_str(), name_len, value_len })
    }

    /// The known field this entry resolved to, or [`Field::Unknown`].
    #[inline]
    pub fn field(&self) -> Field {
        self.field
    }

    /// The name exactly as it is transmitted.
    #[inline]
    pub fn name(&self) -> &str {
        &self.line[..usize::from(self.name_len)]
    }

    #[inline]
    pub fn value(&self) -> &str {
        let start = usize::from(self.name_len) + 2;
        &self.line[start..start + usize::from(self.value_len)]
    }

    /// The full wire line including the trailing CRLF.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.line.as_bytes()
    }

    /// Text the name index orders by: the canonical long name of a known
    /// field, so every wire form of one field shares a key.
    pub(crate) fn key(&self) -> &str {
        if self.field.is_known() { self.field.as_str() } else { self.name() }
    }
}

impl fmt::Debug for FieldEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldEntry").field("field", &self.field).field("name", &self.name()).field("value", &self.value()).finish()
    }
}

pub(crate) fn trim_ows(s: &str) -> &str {
    s.trim_matches([' ', '\t'])
}
