//! Parsers for the RFC 7235 authentication field grammar.
//!
//! - [`AuthList`]: challenges in `WWW-Authenticate` / `Proxy-Authenticate`,
//!   or the credentials in `Authorization` / `Proxy-Authorization`
//! - [`AuthParamList`]: the `name=value` parameters of one challenge
//!
//! Both are cheap views over a borrowed string. Every call to `iter()`
//! parses from the start again; nothing is cached.
//!
//! Malformed input is not reported as an error. Iteration simply ends before
//! the first element that does not parse, and `remainder()` on the iterator
//! returns the unparsed tail for callers that need strict validation.
//!
//! ```
//! use micro_fields::auth::AuthList;
//! use micro_fields::fields::Fields;
//! use micro_fields::protocol::{Field, Http};
//!
//! let mut fields = Fields::<Http>::new();
//! fields.insert(Field::WwwAuthenticate, r#"Bearer realm="example", error="invalid_token""#).unwrap();
//!
//! let challenges = AuthList::new(fields.get(Field::WwwAuthenticate));
//! let bearer = challenges.find("bearer").unwrap();
//! assert_eq!(bearer.params().find("error").unwrap().value(), "invalid_token");
//! ```

mod auth_list;
mod grammar;
mod param_list;

pub use auth_list::AuthList;
pub use auth_list::Challenge;
pub use auth_list::Challenges;
pub use param_list::AuthParam;
pub use param_list::AuthParamList;
pub use param_list::AuthParams;
