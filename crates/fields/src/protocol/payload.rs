/// Represents the framing of a message body as described by its header fields.
///
/// This enum is used to determine how the payload should be processed:
/// - Known length: Process exact number of bytes
/// - Chunked: Process using chunked transfer encoding
/// - Until eof: The body runs to the end of the datagram
/// - Empty: No payload to process
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PayloadSize {
    /// Payload with known length in bytes
    Length(u64),
    /// Payload using chunked transfer encoding
    Chunked,
    /// Payload delimited by the transport boundary
    UntilEof,
    /// Empty payload (no body)
    Empty,
}

impl PayloadSize {
    /// Returns true if the payload uses chunked transfer encoding
    #[inline]
    pub fn is_chunked(&self) -> bool {
        matches!(self, PayloadSize::Chunked)
    }

    /// Returns true if the payload is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, PayloadSize::Empty)
    }

    /// Returns the declared length, if any
    #[inline]
    pub fn length(&self) -> Option<u64> {
        match self {
            PayloadSize::Length(n) => Some(*n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(PayloadSize::Chunked.is_chunked());
        assert!(!PayloadSize::Chunked.is_empty());
        assert_eq!(PayloadSize::Chunked.length(), None);

        assert!(PayloadSize::Empty.is_empty());
        assert!(!PayloadSize::Empty.is_chunked());

        assert_eq!(PayloadSize::Length(0).length(), Some(0));
        assert!(!PayloadSize::Length(0).is_empty());

        assert!(!PayloadSize::UntilEof.is_chunked());
        assert!(!PayloadSize::UntilEof.is_empty());
        assert_eq!(PayloadSize::UntilEof.length(), None);
    }
}
