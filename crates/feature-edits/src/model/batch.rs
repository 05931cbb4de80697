//! Edit batch: accumulates adds, updates and deletes for one target
//! collection and submits them as a single apply-edits request.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn run(transport: impl feature_edits::Transport) -> Result<(), feature_edits::EditError> {
//! use feature_edits::{EditBatch, Field, FieldType, Schema, TargetCollection};
//! use serde_json::json;
//!
//! let target = TargetCollection::new(0, "https://host/arcgis/rest/services/Trees/FeatureServer/0", "Trees");
//! let schema = Schema::new("objectid").with_field(Field::new("name", FieldType::String));
//!
//! let mut batch = EditBatch::new(transport, &target, &schema);
//! batch
//!     .add(&[json!({"name": "Oak"})])?
//!     .update(&[json!({"objectid": 5, "name": "Elm"})])?
//!     .delete(&[json!(7), json!(8)])?;
//!
//! let report = batch.exec().await?;
//! for (kind, position, failure) in report.failures() {
//!     eprintln!("{kind} #{position} rejected: {}", failure.description);
//! }
//! # Ok(())
//! # }
//! ```

use serde_json::Value;
use tracing::{debug, warn};

use crate::codec::{Query, decode_edit_results, encode_apply_edits, encode_delete_where};
use crate::error::{EditError, EditKind, ValidationError};
use crate::limits::{APPLY_EDITS_ENDPOINT, DELETE_FEATURES_ENDPOINT};
use crate::model::{
    BatchReport, CreateRecord, DeleteReport, IdMode, Identifier, OutcomeRecord, PendingEdits,
    Schema, TargetCollection, TargetPreview, UpdateRecord,
};
use crate::normalize::{
    check_delete_reference, normalize_create, normalize_delete, normalize_update, update_identifier,
};
use crate::reconcile::{added_ids, map_outcomes};
use crate::transport::{RequestOptions, Transport};

/// Lifecycle of an [`EditBatch`].
///
/// `Empty -> Accumulating -> Submitted`. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Nothing accumulated yet.
    Empty,
    /// At least one record is pending.
    Accumulating,
    /// The request was dispatched. The batch accepts no further work.
    Submitted,
}

/// Single-use batch of edits against one target collection.
///
/// Accumulation is synchronous and local. Each accumulation call either
/// appends all of its records or, on a [`ValidationError`], none of them;
/// records from earlier calls are kept either way.
///
/// The batch is marked [`BatchState::Submitted`] as soon as [`exec`](Self::exec)
/// dispatches the request, even if the transport then fails, since the
/// service may already have applied some edits.
#[derive(Debug)]
pub struct EditBatch<'a, T> {
    transport: T,
    target: &'a TargetCollection,
    schema: &'a Schema,
    mode: IdMode,
    adds: Vec<CreateRecord>,
    updates: Vec<UpdateRecord>,
    deletes: Vec<Identifier>,
    state: BatchState,
}

impl<'a, T: Transport> EditBatch<'a, T> {
    /// Creates an empty batch using the global-ID regime.
    pub fn new(transport: T, target: &'a TargetCollection, schema: &'a Schema) -> Self {
        Self {
            transport,
            target,
            schema,
            mode: IdMode::default(),
            adds: Vec::new(),
            updates: Vec::new(),
            deletes: Vec::new(),
            state: BatchState::Empty,
        }
    }

    /// Sets the identifier regime (builder form).
    pub fn with_mode(mut self, mode: IdMode) -> Self {
        self.mode = mode;
        self
    }

    // =========================================================================
    // Accumulation
    // =========================================================================

    /// Normalizes and appends records to create.
    pub fn add(&mut self, records: &[Value]) -> Result<&mut Self, EditError> {
        self.ensure_open()?;
        let normalized = normalize_create(records, self.schema)?;
        self.adds.extend(normalized);
        self.touch();
        Ok(self)
    }

    /// Normalizes and appends records to update. Each must carry the
    /// identifier field of the current regime.
    pub fn update(&mut self, records: &[Value]) -> Result<&mut Self, EditError> {
        self.ensure_open()?;
        let normalized = normalize_update(records, self.schema, self.mode)?;
        self.updates.extend(normalized);
        self.touch();
        Ok(self)
    }

    /// Validates and appends identifiers to delete.
    pub fn delete(&mut self, ids: &[Value]) -> Result<&mut Self, EditError> {
        self.ensure_open()?;
        let normalized = normalize_delete(ids, self.mode)?;
        self.deletes.extend(normalized);
        self.touch();
        Ok(self)
    }

    /// Addresses records by global ID. This is the default.
    ///
    /// Records accumulated earlier are checked against the new regime when
    /// the request is encoded.
    pub fn use_global_ids(&mut self) -> &mut Self {
        self.mode = IdMode::GlobalIds;
        self
    }

    /// Addresses records by object ID.
    pub fn use_object_ids(&mut self) -> &mut Self {
        self.mode = IdMode::ObjectIds;
        self
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Returns the identifier regime.
    pub fn mode(&self) -> IdMode {
        self.mode
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Returns the total number of pending records across all buckets.
    pub fn pending_count(&self) -> usize {
        self.adds.len() + self.updates.len() + self.deletes.len()
    }

    /// Previews the destination and the pending buckets without submitting.
    ///
    /// Empty buckets are reported as `None`.
    pub fn describe_target(&self) -> TargetPreview<'_> {
        TargetPreview {
            url: &self.target.url,
            service_url: &self.target.service_url,
            name: &self.target.name,
            payload: PendingEdits {
                id: self.target.id,
                adds: non_empty(&self.adds),
                updates: non_empty(&self.updates),
                deletes: non_empty(&self.deletes),
            },
        }
    }

    /// Encodes the request [`exec`](Self::exec) would send.
    ///
    /// Fails if a pending update or delete cannot be addressed under the
    /// current regime.
    pub fn encode_request(&self) -> Result<Query, EditError> {
        self.check_identifiers()?;
        encode_apply_edits(&self.adds, &self.updates, &self.deletes, self.mode)
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Submits all pending edits in one request and reconciles the results.
    ///
    /// Per-record rejections are reported in the [`BatchReport`], not as
    /// errors. Fails if the transport fails, if the response does not have
    /// the expected shape, or if the batch was already submitted.
    pub async fn exec(&mut self) -> Result<BatchReport, EditError> {
        self.ensure_open()?;
        let ids = self.check_identifiers()?;
        for (update, id) in self.updates.iter_mut().zip(ids) {
            update.id = id;
        }
        let query = encode_apply_edits(&self.adds, &self.updates, &self.deletes, self.mode)?;
        let url = self.target.endpoint(APPLY_EDITS_ENDPOINT);

        debug!(
            collection = self.target.id,
            adds = self.adds.len(),
            updates = self.updates.len(),
            deletes = self.deletes.len(),
            global_ids = self.mode.uses_global_ids(),
            "submitting edits"
        );
        self.state = BatchState::Submitted;

        let response = self.transport.send(&url, RequestOptions::post(query)).await?;
        let results = decode_edit_results(response)?;

        let added = reconcile(EditKind::Add, self.adds.len(), results.add_results.as_ref())?;
        let updated =
            reconcile(EditKind::Update, self.updates.len(), results.update_results.as_ref())?;
        let deleted =
            reconcile(EditKind::Delete, self.deletes.len(), results.delete_results.as_ref())?;

        let report = BatchReport {
            collection_id: self.target.id,
            added_object_ids: added_ids(&added),
            added,
            updated,
            deleted,
        };

        let failed = report.failures().count();
        if failed > 0 {
            warn!(
                collection = self.target.id,
                failed,
                submitted = self.pending_count(),
                "service rejected some edits"
            );
        }

        Ok(report)
    }

    /// Re-reads update identifiers and re-checks delete references under
    /// the current regime, which may have changed since accumulation.
    fn check_identifiers(&self) -> Result<Vec<Identifier>, ValidationError> {
        for (index, id) in self.deletes.iter().enumerate() {
            check_delete_reference(index, id, self.mode)?;
        }
        self.updates
            .iter()
            .enumerate()
            .map(|(index, update)| {
                update_identifier(index, &update.attributes, self.schema, self.mode)
            })
            .collect()
    }

    fn ensure_open(&self) -> Result<(), EditError> {
        if self.state == BatchState::Submitted {
            return Err(EditError::AlreadySubmitted);
        }
        Ok(())
    }

    fn touch(&mut self) {
        if self.pending_count() > 0 {
            self.state = BatchState::Accumulating;
        }
    }
}

/// Deletes every record of `target` matching a filter expression.
///
/// Bypasses batching: the filter, not explicit identifiers, selects the
/// records. Returns one outcome per deleted record as reported by the
/// service.
pub async fn delete_where<T: Transport + ?Sized>(
    transport: &T,
    target: &TargetCollection,
    where_clause: &str,
) -> Result<DeleteReport, EditError> {
    if where_clause.trim().is_empty() {
        return Err(ValidationError::EmptyWhereClause.into());
    }

    let url = target.endpoint(DELETE_FEATURES_ENDPOINT);
    debug!(collection = target.id, where_clause, "deleting by filter");

    let response = transport
        .send(&url, RequestOptions::post(encode_delete_where(where_clause)))
        .await?;
    let results = decode_edit_results(response)?;
    let deleted = map_outcomes(EditKind::Delete, results.delete_results.as_ref())?;

    Ok(DeleteReport {
        collection_id: target.id,
        deleted,
    })
}

/// Maps a result array and checks it is parallel to the submitted bucket.
fn reconcile(
    kind: EditKind,
    submitted: usize,
    results: Option<&Value>,
) -> Result<Vec<OutcomeRecord>, EditError> {
    let outcomes = map_outcomes(kind, results)?;
    if outcomes.len() != submitted {
        return Err(EditError::ResultCountMismatch {
            kind,
            expected: submitted,
            actual: outcomes.len(),
        });
    }
    Ok(outcomes)
}

fn non_empty<T>(items: &[T]) -> Option<&[T]> {
    if items.is_empty() { None } else { Some(items) }
}
