//! Data model types for feature edits.
//!
//! This module contains the types that flow through an edit submission:
//! - Identifiers and the identifier regime
//! - The field schema of a target collection
//! - Normalized pending records
//! - Per-record outcomes and reports
//! - The target collection and its preview
//! - The edit batch itself

pub mod batch;
pub mod id;
pub mod outcome;
pub mod record;
pub mod schema;
pub mod target;

pub use batch::{BatchState, EditBatch, delete_where};
pub use id::{IdMode, Identifier, normalize_global_id};
pub use outcome::{BatchReport, DeleteReport, EditFailure, OutcomeRecord};
pub use record::{Attributes, CreateRecord, UpdateRecord};
pub use schema::{Field, FieldType, Schema};
pub use target::{PendingEdits, TargetCollection, TargetPreview};
