//! The header field store and the message semantics derived from it.
//!
//! - [`Fields`]: an ordered, multi-valued collection of [`FieldEntry`]
//!   values with case-insensitive lookup, plus the start line text
//! - [`FieldId`]: a handle to one entry that stays valid until the entry is
//!   removed
//! - [`FieldName`]: anything usable as a name, a [`Field`](crate::protocol::Field)
//!   or a string
//!
//! The derived semantics (`chunked`, `keep_alive`, `content_length`,
//! `payload_size`) are methods on [`Fields`] that read and edit the
//! `Transfer-Encoding`, `Connection` and `Content-Length` fields.

mod entry;
pub use entry::FieldEntry;
pub use entry::MAX_NAME_LEN;
pub use entry::MAX_VALUE_LEN;

mod store;
pub use store::FieldId;
pub use store::FieldName;
pub use store::Fields;
pub use store::Iter;

mod semantics;
mod start_line;
mod token_list;
