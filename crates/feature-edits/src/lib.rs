//! Batched edits against a remote feature service.
//!
//! This crate collects create, update and delete operations for one feature
//! collection, submits them as a single apply-edits request, and maps the
//! service's per-record results back onto an ordered, typed report.
//!
//! # Overview
//!
//! - **Normalization**: loosely-typed JSON records are checked against the
//!   collection's [`Schema`] before anything is sent
//! - **One round trip**: adds, updates and deletes travel together
//! - **Partial success**: the request is sent with `rollbackOnFailure=false`,
//!   so rejected records are reported as data, not as errors
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use feature_edits::{EditBatch, Schema, TargetCollection, Transport};
//! use serde_json::json;
//!
//! async fn prune(transport: impl Transport) -> Result<Vec<i64>, feature_edits::EditError> {
//!     let target = TargetCollection::new(0, "https://host/arcgis/rest/services/Trees/FeatureServer/0", "Trees");
//!     let schema = Schema::new("objectid");
//!
//!     let mut batch = EditBatch::new(transport, &target, &schema);
//!     batch.use_object_ids().delete(&[json!(7), json!(8)])?;
//!
//!     let report = batch.exec().await?;
//!     Ok(report.deleted.iter().filter_map(|o| o.object_id()).collect())
//! }
//! ```
//!
//! # Modules
//!
//! - [`model`]: Identifiers, schema, records, outcomes and the [`EditBatch`]
//! - [`normalize`]: Record normalizers
//! - [`reconcile`]: Server result mapping
//! - [`codec`]: Request encoding and response decoding
//! - [`transport`]: The transport collaborator contract
//! - [`error`]: Error types
//! - [`limits`]: Endpoint names and fixed request parameters

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod transport;

// Re-export commonly used types at crate root
pub use codec::{Query, encode_apply_edits, encode_delete_where, render_deletes};
pub use error::{EditError, EditKind, TransportError, ValidationError};
pub use model::{
    Attributes, BatchReport, BatchState, CreateRecord, DeleteReport, EditBatch, EditFailure, Field,
    FieldType, IdMode, Identifier, OutcomeRecord, PendingEdits, Schema, TargetCollection,
    TargetPreview, UpdateRecord, delete_where, normalize_global_id,
};
pub use normalize::{
    check_delete_reference, normalize_create, normalize_delete, normalize_update, update_identifier,
};
pub use reconcile::{added_ids, extract_added_ids, map_outcomes};
pub use transport::{Method, RequestOptions, Response, ResponseType, Transport};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
