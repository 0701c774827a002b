//! Known header field names.
//!
//! [`Field`] enumerates the header names that the HTTP and SIP stacks treat
//! specially, plus [`Field::Unknown`] for every other name. Lookup from text is
//! ASCII case-insensitive and only knows the canonical long forms; compact SIP
//! forms are resolved by the protocol policy, see
//! [`Protocol::string_to_field`](crate::protocol::Protocol::string_to_field).

use std::fmt;
use std::str::FromStr;

macro_rules! known_fields {
    (
        $(
            $(#[$docs:meta])*
            ($variant:ident, $name:expr);
        )+
    ) => {
        /// A header field name known to the HTTP or SIP stack.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[non_exhaustive]
        pub enum Field {
            /// Any field name that is not in the table.
            Unknown,
        $(
            $(#[$docs])*
            $variant,
        )+
        }

        /// Every known field, in table order. `Field::Unknown` is not included.
        const KNOWN: &[Field] = &[$(Field::$variant,)+];

        impl Field {
            /// Returns the canonical long form of the field name.
            ///
            /// `Field::Unknown` has no text and returns `""`.
            pub const fn as_str(self) -> &'static str {
                match self {
                    Field::Unknown => "",
                $(
                    Field::$variant => $name,
                )+
                }
            }
        }
    };
}

known_fields! {
    (Accept, "Accept");
    (AcceptEncoding, "Accept-Encoding");
    (AcceptLanguage, "Accept-Language");
    (AlertInfo, "Alert-Info");
    (Allow, "Allow");
    (AuthenticationInfo, "Authentication-Info");
    (Authorization, "Authorization");
    (CacheControl, "Cache-Control");
    /// SIP compact form `i`.
    (CallId, "Call-ID");
    (CallInfo, "Call-Info");
    (Connection, "Connection");
    /// SIP compact form `m`.
    (Contact, "Contact");
    (ContentDisposition, "Content-Disposition");
    /// SIP compact form `e`.
    (ContentEncoding, "Content-Encoding");
    (ContentLanguage, "Content-Language");
    /// SIP compact form `l`.
    (ContentLength, "Content-Length");
    /// SIP compact form `c`.
    (ContentType, "Content-Type");
    (Cookie, "Cookie");
    (Cseq, "CSeq");
    (Date, "Date");
    (ErrorInfo, "Error-Info");
    (Expect, "Expect");
    (Expires, "Expires");
    /// SIP compact form `f`.
    (From, "From");
    (Host, "Host");
    (InReplyTo, "In-Reply-To");
    (KeepAlive, "Keep-Alive");
    (Location, "Location");
    (MaxForwards, "Max-Forwards");
    (MimeVersion, "MIME-Version");
    (MinExpires, "Min-Expires");
    (Organization, "Organization");
    (Priority, "Priority");
    (ProxyAuthenticate, "Proxy-Authenticate");
    (ProxyAuthorization, "Proxy-Authorization");
    (ProxyRequire, "Proxy-Require");
    (RecordRoute, "Record-Route");
    (ReplyTo, "Reply-To");
    (Require, "Require");
    (RetryAfter, "Retry-After");
    (Route, "Route");
    (Server, "Server");
    /// SIP compact form `s`.
    (Subject, "Subject");
    /// SIP compact form `k`.
    (Supported, "Supported");
    (Te, "TE");
    (Timestamp, "Timestamp");
    /// SIP compact form `t`.
    (To, "To");
    (Trailer, "Trailer");
    (TransferEncoding, "Transfer-Encoding");
    (Unsupported, "Unsupported");
    (Upgrade, "Upgrade");
    (UserAgent, "User-Agent");
    /// SIP compact form `v`.
    (Via, "Via");
    (Warning, "Warning");
    (WwwAuthenticate, "WWW-Authenticate");
}

impl Field {
    /// Resolves a long-form field name, ignoring ASCII case.
    ///
    /// Names that are not in the table resolve to [`Field::Unknown`].
    pub fn from_name(name: &str) -> Field {
        KNOWN.iter().copied().find(|field| field.as_str().eq_ignore_ascii_case(name)).unwrap_or(Field::Unknown)
    }

    /// Returns true for every variant except [`Field::Unknown`].
    #[inline]
    pub fn is_known(self) -> bool {
        self != Field::Unknown
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Field::from_name(s))
    }
}
