//! Wire encoding of edit requests and decoding of edit responses.
//!
//! Requests are flat key/value queries sent form-encoded; array payloads
//! inside them are JSON text. Responses are JSON documents.

pub mod query;
pub mod request;
pub mod response;

pub use query::Query;
pub use request::{encode_apply_edits, encode_delete_where, render_deletes};
pub use response::{EditResults, decode_edit_results};
