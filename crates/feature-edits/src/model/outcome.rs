//! Per-record outcomes and the reports built from them.

use crate::error::EditKind;
use crate::model::Identifier;

/// A per-record rejection reported by the service.
///
/// This is data, not an error: a batch with failed records still returns
/// a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditFailure {
    pub code: i64,
    pub description: String,
}

/// Outcome of one submitted record, positionally aligned with the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeRecord {
    /// The record was applied. At least one of the identifiers is present.
    Success {
        object_id: Option<i64>,
        global_id: Option<String>,
    },
    /// The record was rejected.
    Failure {
        object_id: Option<i64>,
        global_id: Option<String>,
        error: EditFailure,
    },
}

impl OutcomeRecord {
    /// Returns true if the record was applied.
    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeRecord::Success { .. })
    }

    /// Returns the object ID reported for this record.
    pub fn object_id(&self) -> Option<i64> {
        match self {
            OutcomeRecord::Success { object_id, .. } | OutcomeRecord::Failure { object_id, .. } => {
                *object_id
            }
        }
    }

    /// Returns the global ID reported for this record.
    pub fn global_id(&self) -> Option<&str> {
        match self {
            OutcomeRecord::Success { global_id, .. } | OutcomeRecord::Failure { global_id, .. } => {
                global_id.as_deref()
            }
        }
    }

    /// Returns the best available identifier, preferring the object ID.
    pub fn id(&self) -> Option<Identifier> {
        self.object_id()
            .map(Identifier::Integer)
            .or_else(|| self.global_id().map(Identifier::from))
    }

    /// Returns the failure, if the record was rejected.
    pub fn error(&self) -> Option<&EditFailure> {
        match self {
            OutcomeRecord::Success { .. } => None,
            OutcomeRecord::Failure { error, .. } => Some(error),
        }
    }
}

/// Result of one apply-edits submission.
///
/// `added`, `updated` and `deleted` have exactly the length and order of the
/// records submitted in each bucket. `added_object_ids` lists the object IDs
/// of successful adds only, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub collection_id: u32,
    pub added: Vec<OutcomeRecord>,
    pub updated: Vec<OutcomeRecord>,
    pub deleted: Vec<OutcomeRecord>,
    pub added_object_ids: Vec<i64>,
}

impl BatchReport {
    /// Returns true if every submitted record was applied.
    pub fn is_complete_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Iterates over rejected records as `(bucket, position, failure)`.
    pub fn failures(&self) -> impl Iterator<Item = (EditKind, usize, &EditFailure)> {
        failures_in(EditKind::Add, &self.added)
            .chain(failures_in(EditKind::Update, &self.updated))
            .chain(failures_in(EditKind::Delete, &self.deleted))
    }
}

fn failures_in(
    kind: EditKind,
    outcomes: &[OutcomeRecord],
) -> impl Iterator<Item = (EditKind, usize, &EditFailure)> {
    outcomes
        .iter()
        .enumerate()
        .filter_map(move |(i, o)| o.error().map(|e| (kind, i, e)))
}

/// Result of a delete-by-filter request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteReport {
    pub collection_id: u32,
    pub deleted: Vec<OutcomeRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(code: i64) -> OutcomeRecord {
        OutcomeRecord::Failure {
            object_id: None,
            global_id: None,
            error: EditFailure {
                code,
                description: "rejected".to_string(),
            },
        }
    }

    fn applied(object_id: i64) -> OutcomeRecord {
        OutcomeRecord::Success {
            object_id: Some(object_id),
            global_id: None,
        }
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = OutcomeRecord::Success {
            object_id: None,
            global_id: Some("{A}".to_string()),
        };
        assert!(ok.is_success());
        assert_eq!(ok.object_id(), None);
        assert_eq!(ok.id(), Some(Identifier::String("{A}".to_string())));
        assert!(ok.error().is_none());

        let bad = failed(1000);
        assert!(!bad.is_success());
        assert_eq!(bad.id(), None);
        assert_eq!(bad.error().unwrap().code, 1000);
    }

    #[test]
    fn test_report_failures() {
        let report = BatchReport {
            collection_id: 0,
            added: vec![applied(1), failed(10)],
            updated: vec![applied(2)],
            deleted: vec![failed(20), applied(3)],
            added_object_ids: vec![1],
        };

        assert!(!report.is_complete_success());
        let failures: Vec<_> = report.failures().map(|(k, i, e)| (k, i, e.code)).collect();
        assert_eq!(
            failures,
            vec![(EditKind::Add, 1, 10), (EditKind::Delete, 0, 20)]
        );
    }

    #[test]
    fn test_empty_report_is_success() {
        assert!(BatchReport::default().is_complete_success());
    }
}
