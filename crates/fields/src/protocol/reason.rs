//! Default reason phrases used when a response carries no explicit reason.

/// Returned for a status code no table knows.
pub const UNKNOWN_STATUS: &str = "<unknown-status>";

/// Reason phrase for an HTTP status code.
pub fn http_reason(status: u16) -> &'static str {
    http::StatusCode::from_u16(status).ok().and_then(|code| code.canonical_reason()).unwrap_or(UNKNOWN_STATUS)
}

/// Reason phrase for a SIP status code, RFC 3261 section 21.
///
/// Codes SIP shares with HTTP but does not list fall back to the HTTP text.
pub fn sip_reason(status: u16) -> &'static str {
    match status {
        100 => "Trying",
        180 => "Ringing",
        181 => "Call Is Being Forwarded",
        182 => "Queued",
        183 => "Session Progress",
        200 => "OK",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Moved Temporarily",
        305 => "Use Proxy",
        380 => "Alternative Service",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        410 => "Gone",
        413 => "Request Entity Too Large",
        414 => "Request-URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Unsupported URI Scheme",
        420 => "Bad Extension",
        421 => "Extension Required",
        423 => "Interval Too Brief",
        480 => "Temporarily Unavailable",
        481 => "Call/Transaction Does Not Exist",
        482 => "Loop Detected",
        483 => "Too Many Hops",
        484 => "Address Incomplete",
        485 => "Ambiguous",
        486 => "Busy Here",
        487 => "Request Terminated",
        488 => "Not Acceptable Here",
        491 => "Request Pending",
        493 => "Undecipherable",
        500 => "Server Internal Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Server Time-out",
        505 => "Version Not Supported",
        513 => "Message Too Large",
        600 => "Busy Everywhere",
        603 => "Decline",
        604 => "Does Not Exist Anywhere",
        606 => "Not Acceptable",
        _ => http_reason(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_reasons() {
        assert_eq!(http_reason(200), "OK");
        assert_eq!(http_reason(404), "Not Found");
        assert_eq!(http_reason(999), UNKNOWN_STATUS);
        assert_eq!(http_reason(42), UNKNOWN_STATUS);
    }

    #[test]
    fn sip_reasons() {
        assert_eq!(sip_reason(180), "Ringing");
        assert_eq!(sip_reason(481), "Call/Transaction Does Not Exist");
        assert_eq!(sip_reason(504), "Server Time-out");
        // not listed by SIP, HTTP has it
        assert_eq!(sip_reason(429), "Too Many Requests");
        assert_eq!(sip_reason(699), UNKNOWN_STATUS);
    }
}
