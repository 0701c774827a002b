//! Zero-copy serialization of a message head.
//!
//! A [`WireView`] walks the start line, every packed field line and the final
//! CRLF as a sequence of borrowed fragments. Only the version text and the
//! status code are formatted; everything else points into the store.

use std::fmt;
use std::io::IoSlice;

use bytes::Buf;
use http::StatusCode;

use crate::ensure;
use crate::fields::{FieldEntry, Fields, Iter};
use crate::protocol::{Protocol, SendError};

const CRLF: &[u8] = b"\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Borrowed(&'a [u8]),
    Formatted,
}

/// The three start line pieces, one of which is formatted.
#[derive(Debug)]
struct StartPieces<'a> {
    formatted: String,
    pieces: [Piece<'a>; 3],
}

impl StartPieces<'_> {
    fn piece(&self, index: usize) -> &[u8] {
        match self.pieces[index] {
            Piece::Borrowed(bytes) => bytes,
            Piece::Formatted => self.formatted.as_bytes(),
        }
    }

    fn len(&self) -> usize {
        (0..self.pieces.len()).map(|index| self.piece(index).len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start(usize),
    Fields,
    Terminator,
    Done,
}

/// Which fragment the walk is on.
#[derive(Debug, Clone)]
struct Position<'a> {
    stage: Stage,
    entry: Option<&'a FieldEntry>,
    entries: Iter<'a>,
}

impl<'a> Position<'a> {
    fn fragment<'v>(&self, start: &'v StartPieces<'a>) -> &'v [u8] {
        match self.stage {
            Stage::Start(index) => start.piece(index),
            Stage::Fields => self.entry.map_or(b"".as_slice(), FieldEntry::as_bytes),
            Stage::Terminator => CRLF,
            Stage::Done => &[],
        }
    }

    fn step(&mut self) {
        self.stage = match self.stage {
            Stage::Start(index) if index + 1 < 3 => Stage::Start(index + 1),
            Stage::Start(_) | Stage::Fields => {
                self.entry = self.entries.next();
                if self.entry.is_some() { Stage::Fields } else { Stage::Terminator }
            }
            Stage::Terminator | Stage::Done => Stage::Done,
        };
    }

    /// Moves past empty fragments so the current one has bytes or the walk
    /// is done.
    fn settle(&mut self, start: &StartPieces<'a>) {
        while self.stage != Stage::Done && self.fragment(start).is_empty() {
            self.step();
        }
    }
}

/// A borrowed, lazily walked serialization of a message head.
///
/// Created by [`Fields::request_view`] or [`Fields::response_view`]. The
/// store cannot be modified while a view is alive.
///
/// ```
/// use bytes::Buf;
/// use http::StatusCode;
/// use micro_fields::fields::Fields;
/// use micro_fields::protocol::{Field, Http};
///
/// let mut fields = Fields::<Http>::new();
/// fields.insert(Field::Server, "micro").unwrap();
///
/// let mut view = fields.response_view(11, StatusCode::NOT_FOUND).unwrap();
/// let bytes = view.copy_to_bytes(view.remaining());
/// assert_eq!(&bytes[..], b"HTTP/1.1 404 Not Found\r\nServer: micro\r\n\r\n");
/// ```
pub struct WireView<'a> {
    start: StartPieces<'a>,
    position: Position<'a>,
    offset: usize,
    remaining: usize,
}

impl<'a> WireView<'a> {
    fn new(start: StartPieces<'a>, entries: Iter<'a>) -> Self {
        let fields_len: usize = entries.clone().map(|entry| entry.as_bytes().len()).sum();
        let remaining = start.len() + fields_len + CRLF.len();

        let mut position = Position { stage: Stage::Start(0), entry: None, entries };
        position.settle(&start);
        Self { start, position, offset: 0, remaining }
    }

    /// The remaining non-empty fragments, starting with the unconsumed part
    /// of the current one.
    pub fn fragments(&self) -> Fragments<'_, 'a> {
        Fragments { start: &self.start, position: self.position.clone(), offset: self.offset }
    }
}

impl Buf for WireView<'_> {
    #[inline]
    fn remaining(&self) -> usize {
        self.remaining
    }

    fn chunk(&self) -> &[u8] {
        &self.position.fragment(&self.start)[self.offset..]
    }

    fn advance(&mut self, cnt: usize) {
        assert!(cnt <= self.remaining, "cannot advance past the end of the view: {cnt} > {}", self.remaining);
        self.remaining -= cnt;

        let mut cnt = cnt;
        while cnt > 0 {
            let left = self.position.fragment(&self.start).len() - self.offset;
            if cnt < left {
                self.offset += cnt;
                return;
            }
            cnt -= left;
            self.offset = 0;
            self.position.step();
            self.position.settle(&self.start);
        }
    }

    fn chunks_vectored<'s>(&'s self, dst: &mut [IoSlice<'s>]) -> usize {
        let mut filled = 0;
        for (slot, fragment) in dst.iter_mut().zip(self.fragments()) {
            *slot = IoSlice::new(fragment);
            filled += 1;
        }
        filled
    }
}

impl fmt::Debug for WireView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireView").field("stage", &self.position.stage).field("remaining", &self.remaining).finish()
    }
}

/// Iterator over the fragments of a [`WireView`].
#[derive(Debug, Clone)]
pub struct Fragments<'v, 'a> {
    start: &'v StartPieces<'a>,
    position: Position<'a>,
    offset: usize,
}

impl<'v> Iterator for Fragments<'v, '_> {
    type Item = &'v [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.position.stage == Stage::Done {
            return None;
        }
        let fragment = &self.position.fragment(self.start)[self.offset..];
        self.offset = 0;
        self.position.step();
        self.position.settle(self.start);
        Some(fragment)
    }
}

/// `NAME/M.m` for a version the protocol accepts.
fn version_text<P: Protocol>(version: u8) -> Result<String, SendError> {
    ensure!(P::check_version(version), SendError::InvalidVersion(version));
    Ok(format!("{}/{}.{}", P::name(), version / 10, version % 10))
}

impl<P: Protocol> Fields<P> {
    /// Serializes a request head: `method SP target SP NAME/M.m CRLF`, the
    /// fields, then CRLF.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::InvalidVersion`] if `P` rejects `version`.
    pub fn request_view(&self, version: u8) -> Result<WireView<'_>, SendError> {
        let start = StartPieces {
            formatted: format!(" {}\r\n", version_text::<P>(version)?),
            pieces: [
                Piece::Borrowed(self.start_line.method().as_bytes()),
                Piece::Borrowed(self.start_line.spaced_target().as_bytes()),
                Piece::Formatted,
            ],
        };
        Ok(WireView::new(start, self.iter()))
    }

    /// Serializes a response head: `NAME/M.m SP status SP reason CRLF`, the
    /// fields, then CRLF. Without an explicit reason the protocol default for
    /// `status` is used.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::InvalidVersion`] if `P` rejects `version`.
    pub fn response_view(&self, version: u8, status: StatusCode) -> Result<WireView<'_>, SendError> {
        let reason = match self.start_line.target_or_reason() {
            "" => P::default_reason(status.as_u16()),
            reason => reason,
        };
        // StatusCode is always three digits
        let start = StartPieces {
            formatted: format!("{} {} ", version_text::<P>(version)?, status.as_str()),
            pieces: [Piece::Formatted, Piece::Borrowed(reason.as_bytes()), Piece::Borrowed(CRLF)],
        };
        Ok(WireView::new(start, self.iter()))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Buf;
    use http::StatusCode;
    use indoc::indoc;
    use std::io::IoSlice;

    use crate::fields::Fields;
    use crate::protocol::{Field, Http, SendError, SipDatagram, SipStream};

    fn drain(mut view: impl Buf) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(view.remaining());
        while view.has_remaining() {
            let chunk = view.chunk();
            assert!(!chunk.is_empty());
            bytes.extend_from_slice(chunk);
            let len = chunk.len();
            view.advance(len);
        }
        bytes
    }

    fn crlf(text: &str) -> Vec<u8> {
        text.replace('\n', "\r\n").into_bytes()
    }

    #[test]
    fn default_reason_in_status_line() {
        let fields = Fields::<Http>::new();
        assert_eq!(drain(fields.response_view(11, StatusCode::NOT_FOUND).unwrap()), b"HTTP/1.1 404 Not Found\r\n\r\n");
    }

    #[test]
    fn explicit_reason_overrides_default() {
        let mut fields = Fields::<Http>::new();
        fields.set_reason("Whatever");
        let status = StatusCode::from_u16(299).unwrap();
        assert_eq!(drain(fields.response_view(10, status).unwrap()), b"HTTP/1.0 299 Whatever\r\n\r\n");
    }

    #[test]
    fn status_line_always_has_three_digits() {
        assert!(StatusCode::from_u16(42).is_err());
        assert!(StatusCode::from_u16(1000).is_err());

        let fields = Fields::<Http>::new();
        let status = StatusCode::from_u16(999).unwrap();
        assert_eq!(drain(fields.response_view(11, status).unwrap()), b"HTTP/1.1 999 <unknown-status>\r\n\r\n");
    }

    #[test]
    fn foreign_version_is_rejected() {
        let http = Fields::<Http>::new();
        assert!(matches!(http.request_view(100), Err(SendError::InvalidVersion(100))));
        assert!(matches!(http.response_view(20, StatusCode::OK), Err(SendError::InvalidVersion(20))));

        let sip = Fields::<SipStream>::new();
        assert!(matches!(sip.request_view(11), Err(SendError::InvalidVersion(11))));
        assert!(matches!(sip.response_view(11, StatusCode::OK), Err(SendError::InvalidVersion(11))));
    }

    #[test]
    fn request_head() {
        let mut fields = Fields::<Http>::new();
        fields.set_method(http::Method::GET);
        fields.set_target("/index.html");
        fields.insert(Field::Host, "example.com").unwrap();
        fields.insert("X-Trace", " abc ").unwrap();
        fields.insert(Field::Accept, "*/*").unwrap();

        let expected = indoc! {"
            GET /index.html HTTP/1.1
            Host: example.com
            X-Trace: abc
            Accept: */*

        "};
        assert_eq!(drain(fields.request_view(11).unwrap()), crlf(expected));
    }

    #[test]
    fn remaining_matches_output() {
        let mut fields = Fields::<Http>::new();
        fields.set_method("POST");
        fields.set_target("/");
        fields.insert(Field::ContentLength, "0").unwrap();

        let view = fields.request_view(11).unwrap();
        let remaining = view.remaining();
        assert_eq!(drain(view).len(), remaining);
    }

    #[test]
    fn partial_advance() {
        let mut fields = Fields::<Http>::new();
        fields.insert(Field::Server, "micro").unwrap();

        let mut view = fields.response_view(11, StatusCode::OK).unwrap();
        let total = view.remaining();
        view.advance(4);
        assert_eq!(view.chunk(), b"/1.1 200 ");
        view.advance(11);
        assert_eq!(view.chunk(), b"\r\n");
        view.advance(3);
        assert_eq!(view.chunk(), b"erver: micro\r\n");
        assert_eq!(view.remaining(), total - 18);
        assert_eq!(drain(view), b"erver: micro\r\n\r\n");
    }

    #[test]
    #[should_panic(expected = "cannot advance past the end")]
    fn advance_past_end_panics() {
        let fields = Fields::<Http>::new();
        let mut view = fields.response_view(11, StatusCode::OK).unwrap();
        let remaining = view.remaining();
        view.advance(remaining + 1);
    }

    #[test]
    fn empty_method_is_skipped() {
        let fields = Fields::<Http>::new();
        let view = fields.request_view(11).unwrap();
        let fragments: Vec<&[u8]> = view.fragments().collect();
        assert_eq!(fragments, vec![&b" "[..], &b" HTTP/1.1\r\n"[..], &b"\r\n"[..]]);
    }

    #[test]
    fn vectored_fragments() {
        let mut fields = Fields::<Http>::new();
        fields.insert(Field::Server, "micro").unwrap();
        fields.insert(Field::Date, "today").unwrap();

        let mut view = fields.response_view(11, StatusCode::OK).unwrap();
        view.advance(2);

        let mut slices = [IoSlice::new(&[]); 8];
        let filled = view.chunks_vectored(&mut slices);
        assert_eq!(filled, 6);
        let joined: Vec<u8> = slices[..filled].iter().flat_map(|slice| slice.iter().copied()).collect();
        assert_eq!(joined, b"TP/1.1 200 OK\r\nServer: micro\r\nDate: today\r\n\r\n");

        let mut few = [IoSlice::new(&[]); 2];
        assert_eq!(view.chunks_vectored(&mut few), 2);
        assert_eq!(&*few[1], b"OK");
    }

    #[test]
    fn httparse_accepts_request() {
        let mut fields = Fields::<Http>::new();
        fields.set_method("PUT");
        fields.set_target("/upload?id=7");
        fields.insert(Field::Host, "localhost:8080").unwrap();
        fields.insert(Field::ContentType, "text/plain").unwrap();
        fields.set_content_length(Some(5)).unwrap();
        fields.insert("X-Dup", "1").unwrap();
        fields.insert("x-dup", "2").unwrap();

        let bytes = drain(fields.request_view(11).unwrap());
        let mut headers = [httparse::EMPTY_HEADER; 16];
        let mut request = httparse::Request::new(&mut headers);
        let status = request.parse(&bytes).unwrap();

        assert_eq!(status, httparse::Status::Complete(bytes.len()));
        assert_eq!(request.method, Some("PUT"));
        assert_eq!(request.path, Some("/upload?id=7"));
        assert_eq!(request.version, Some(1));
        let parsed: Vec<(&str, &[u8])> = request.headers.iter().map(|h| (h.name, h.value)).collect();
        assert_eq!(
            parsed,
            vec![
                ("Host", &b"localhost:8080"[..]),
                ("Content-Type", &b"text/plain"[..]),
                ("Content-Length", &b"5"[..]),
                ("X-Dup", &b"1"[..]),
                ("x-dup", &b"2"[..]),
            ]
        );
    }

    #[test]
    fn httparse_accepts_response() {
        let mut fields = Fields::<Http>::new();
        fields.insert(Field::Server, "micro").unwrap();
        fields.set_chunked(true).unwrap();

        let bytes = drain(fields.response_view(11, StatusCode::SERVICE_UNAVAILABLE).unwrap());
        let mut headers = [httparse::EMPTY_HEADER; 4];
        let mut response = httparse::Response::new(&mut headers);
        assert_eq!(response.parse(&bytes).unwrap(), httparse::Status::Complete(bytes.len()));
        assert_eq!(response.code, Some(503));
        assert_eq!(response.reason, Some("Service Unavailable"));
        assert_eq!(response.headers.len(), 2);
        assert_eq!(response.headers[1].name, "Transfer-Encoding");
        assert_eq!(response.headers[1].value, b"chunked");
    }

    #[test]
    fn sip_datagram_request_uses_compact_names() {
        let mut fields = Fields::<SipDatagram>::new();
        fields.set_method("INVITE");
        fields.set_target("sip:bob@biloxi.example.com");
        fields.insert(Field::Via, "SIP/2.0/UDP pc33.atlanta.example.com;branch=z9hG4bK776asdhds").unwrap();
        fields.insert(Field::To, "Bob <sip:bob@biloxi.example.com>").unwrap();
        fields.insert(Field::CallId, "a84b4c76e66710").unwrap();
        fields.insert(Field::Cseq, "314159 INVITE").unwrap();
        fields.set_content_length(Some(0)).unwrap();

        let expected = indoc! {"
            INVITE sip:bob@biloxi.example.com SIP/2.0
            v: SIP/2.0/UDP pc33.atlanta.example.com;branch=z9hG4bK776asdhds
            t: Bob <sip:bob@biloxi.example.com>
            i: a84b4c76e66710
            CSeq: 314159 INVITE
            l: 0

        "};
        assert_eq!(drain(fields.request_view(20).unwrap()), crlf(expected));
    }

    #[test]
    fn sip_stream_response_uses_sip_reasons() {
        let mut fields = Fields::<SipStream>::new();
        fields.insert("v", "SIP/2.0/TCP host").unwrap();

        let expected = indoc! {"
            SIP/2.0 180 Ringing
            v: SIP/2.0/TCP host

        "};
        assert_eq!(drain(fields.response_view(20, StatusCode::from_u16(180).unwrap()).unwrap()), crlf(expected));
    }
}
