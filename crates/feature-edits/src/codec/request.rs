//! Encoding of outgoing edit requests.

use crate::codec::Query;
use crate::error::EditError;
use crate::limits::{RESPONSE_FORMAT, ROLLBACK_ON_FAILURE};
use crate::model::{CreateRecord, IdMode, Identifier, UpdateRecord};

/// Renders delete references as a comma-joined list.
///
/// Under [`IdMode::GlobalIds`] every identifier is wrapped in double quotes
/// (`"1","2","3"`); under [`IdMode::ObjectIds`] they are bare (`1,2,3`).
/// Returns `None` when there is nothing to delete.
pub fn render_deletes(ids: &[Identifier], mode: IdMode) -> Option<String> {
    if ids.is_empty() {
        return None;
    }
    let rendered: Vec<String> = match mode {
        IdMode::GlobalIds => ids.iter().map(|id| format!("\"{id}\"")).collect(),
        IdMode::ObjectIds => ids.iter().map(Identifier::to_string).collect(),
    };
    Some(rendered.join(","))
}

/// Encodes an apply-edits request.
///
/// Empty buckets are explicitly absent, never sent as empty arrays.
pub fn encode_apply_edits(
    adds: &[CreateRecord],
    updates: &[UpdateRecord],
    deletes: &[Identifier],
    mode: IdMode,
) -> Result<Query, EditError> {
    Ok(Query::new()
        .with("f", Some(RESPONSE_FORMAT.to_string()))
        .with("useGlobalIds", Some(mode.uses_global_ids().to_string()))
        .with("rollbackOnFailure", Some(ROLLBACK_ON_FAILURE.to_string()))
        .with("adds", encode_bucket("adds", adds)?)
        .with("updates", encode_bucket("updates", updates)?)
        .with("deletes", render_deletes(deletes, mode)))
}

/// Encodes a delete-by-filter request.
pub fn encode_delete_where(where_clause: &str) -> Query {
    Query::new()
        .with("f", Some(RESPONSE_FORMAT.to_string()))
        .with("where", Some(where_clause.to_string()))
}

fn encode_bucket<T: serde::Serialize>(
    name: &'static str,
    records: &[T],
) -> Result<Option<String>, EditError> {
    if records.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(records)
        .map(Some)
        .map_err(|e| EditError::Serialize(format!("{name}: {e}")))
}
