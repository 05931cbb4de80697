//! Error types for edit normalization, submission and reconciliation.

use thiserror::Error;

use crate::model::FieldType;

/// The three edit buckets of an apply-edits request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    Add,
    Update,
    Delete,
}

impl EditKind {
    /// Returns the name of the server result array for this kind.
    pub fn results_field(&self) -> &'static str {
        match self {
            EditKind::Add => "addResults",
            EditKind::Update => "updateResults",
            EditKind::Delete => "deleteResults",
        }
    }
}

impl std::fmt::Display for EditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EditKind::Add => "add",
            EditKind::Update => "update",
            EditKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// A malformed input record. Raised before anything touches the network.
///
/// `index` is the position of the offending record within the input of
/// the call that rejected it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("record {index} is missing identifier field {field:?}")]
    MissingIdentifier { index: usize, field: String },

    #[error("record {index} is missing required field {field:?}")]
    MissingRequiredField { index: usize, field: String },

    #[error("record {index} sets non-nullable field {field:?} to null")]
    NullNotAllowed { index: usize, field: String },

    #[error("record {index} field {field:?}: expected a {expected:?} value")]
    TypeMismatch {
        index: usize,
        field: String,
        expected: FieldType,
    },

    #[error("record {index} field {field:?}: {value:?} is not a valid GUID")]
    InvalidGlobalId {
        index: usize,
        field: String,
        value: String,
    },

    #[error("record {index} has a geometry that is not a JSON object")]
    InvalidGeometry { index: usize },

    #[error("delete reference {index} is not a valid identifier (found {found})")]
    InvalidIdentifier { index: usize, found: &'static str },

    #[error("delete filter expression is empty")]
    EmptyWhereClause,
}

/// Failure reported by the transport collaborator after its own retry
/// policy is exhausted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

/// Error returned by [`EditBatch`](crate::EditBatch) operations.
///
/// Per-record failures inside a well-formed response are never errors;
/// they are reported as [`OutcomeRecord::Failure`](crate::OutcomeRecord).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed response: missing or invalid {context}")]
    MalformedResponse { context: &'static str },

    #[error("malformed {kind} result {index}: {reason}")]
    MalformedResult {
        kind: EditKind,
        index: usize,
        reason: String,
    },

    #[error("{kind} results: expected {expected} entries, server returned {actual}")]
    ResultCountMismatch {
        kind: EditKind,
        expected: usize,
        actual: usize,
    },

    #[error("service error {code}: {message}")]
    Service { code: i64, message: String },

    #[error("edit batch was already submitted")]
    AlreadySubmitted,

    #[error("failed to serialize {0}")]
    Serialize(String),
}
