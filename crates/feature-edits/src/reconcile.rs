//! Mapping of server result arrays onto typed per-record outcomes.
//!
//! The service answers each submitted bucket with an array parallel to the
//! input: `[{objectId?, globalId?, success, error?: {code, description}}]`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{EditError, EditKind};
use crate::model::{EditFailure, OutcomeRecord};

/// One entry of a server result array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditResult {
    #[serde(default)]
    object_id: Option<i64>,
    #[serde(default)]
    global_id: Option<String>,
    success: bool,
    #[serde(default)]
    error: Option<ResultError>,
}

#[derive(Debug, Deserialize)]
struct ResultError {
    #[serde(default)]
    code: i64,
    #[serde(default, alias = "message")]
    description: String,
}

/// Code reported when the service marks a record failed without details.
pub const UNSPECIFIED_FAILURE_CODE: i64 = -1;

/// Maps a server result array to one outcome per entry, in order.
///
/// An absent or `null` array maps to an empty sequence. Anything else that
/// is not an array of result objects is a malformed result.
pub fn map_outcomes(
    kind: EditKind,
    results: Option<&Value>,
) -> Result<Vec<OutcomeRecord>, EditError> {
    let entries = match results {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(EditError::MalformedResponse {
                context: kind.results_field(),
            });
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| map_outcome(kind, index, entry))
        .collect()
}

fn map_outcome(kind: EditKind, index: usize, entry: &Value) -> Result<OutcomeRecord, EditError> {
    let result = EditResult::deserialize(entry).map_err(|e| EditError::MalformedResult {
        kind,
        index,
        reason: e.to_string(),
    })?;

    if result.success {
        if result.object_id.is_none() && result.global_id.is_none() {
            return Err(EditError::MalformedResult {
                kind,
                index,
                reason: "successful result carries neither objectId nor globalId".to_string(),
            });
        }
        // Added object IDs must line up with the successful adds
        if kind == EditKind::Add && result.object_id.is_none() {
            return Err(EditError::MalformedResult {
                kind,
                index,
                reason: "successful add carries no objectId".to_string(),
            });
        }
        return Ok(OutcomeRecord::Success {
            object_id: result.object_id,
            global_id: result.global_id,
        });
    }

    let error = match result.error {
        Some(e) => EditFailure {
            code: e.code,
            description: e.description,
        },
        None => EditFailure {
            code: UNSPECIFIED_FAILURE_CODE,
            description: String::new(),
        },
    };
    Ok(OutcomeRecord::Failure {
        object_id: result.object_id,
        global_id: result.global_id,
        error,
    })
}

/// Returns the object IDs of successful adds, in order.
///
/// Failed adds are skipped, not replaced by a placeholder: the result lines
/// up only with the subset of adds that succeeded.
pub fn extract_added_ids(add_results: Option<&Value>) -> Result<Vec<i64>, EditError> {
    Ok(added_ids(&map_outcomes(EditKind::Add, add_results)?))
}

/// Same as [`extract_added_ids`] over already-mapped outcomes.
pub fn added_ids(outcomes: &[OutcomeRecord]) -> Vec<i64> {
    outcomes
        .iter()
        .filter(|o| o.is_success())
        .filter_map(OutcomeRecord::object_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_absent_results_map_to_empty() {
        assert_eq!(map_outcomes(EditKind::Add, None).unwrap(), vec![]);
        assert_eq!(map_outcomes(EditKind::Add, Some(&Value::Null)).unwrap(), vec![]);
        assert_eq!(map_outcomes(EditKind::Add, Some(&json!([]))).unwrap(), vec![]);
    }

    #[test]
    fn test_mixed_outcomes_keep_order() {
        let results = json!([
            {"objectId": 7, "globalId": "{A}", "success": true},
            {"objectId": 8, "success": false, "error": {"code": 1019, "description": "not found"}}
        ]);
        let outcomes = map_outcomes(EditKind::Delete, Some(&results)).unwrap();

        assert_eq!(
            outcomes,
            vec![
                OutcomeRecord::Success {
                    object_id: Some(7),
                    global_id: Some("{A}".to_string())
                },
                OutcomeRecord::Failure {
                    object_id: Some(8),
                    global_id: None,
                    error: EditFailure {
                        code: 1019,
                        description: "not found".to_string()
                    }
                },
            ]
        );
    }

    #[test]
    fn test_failure_without_error_details() {
        let results = json!([{"success": false}]);
        let outcomes = map_outcomes(EditKind::Update, Some(&results)).unwrap();
        assert_eq!(outcomes[0].error().unwrap().code, UNSPECIFIED_FAILURE_CODE);
    }

    #[test]
    fn test_error_message_alias() {
        let results = json!([{"success": false, "error": {"code": 5, "message": "bad"}}]);
        let outcomes = map_outcomes(EditKind::Update, Some(&results)).unwrap();
        assert_eq!(outcomes[0].error().unwrap().description, "bad");
    }

    #[test]
    fn test_malformed_results() {
        assert_eq!(
            map_outcomes(EditKind::Add, Some(&json!({"success": true}))),
            Err(EditError::MalformedResponse { context: "addResults" })
        );

        let missing_success = json!([{"objectId": 1}]);
        assert!(matches!(
            map_outcomes(EditKind::Add, Some(&missing_success)),
            Err(EditError::MalformedResult { kind: EditKind::Add, index: 0, .. })
        ));

        let no_ids = json!([{"objectId": 1, "success": true}, {"success": true}]);
        assert!(matches!(
            map_outcomes(EditKind::Add, Some(&no_ids)),
            Err(EditError::MalformedResult { index: 1, .. })
        ));
    }

    #[test]
    fn test_add_success_requires_object_id() {
        let results = json!([
            {"objectId": 1, "success": true},
            {"globalId": "{A}", "success": true}
        ]);
        assert_eq!(
            map_outcomes(EditKind::Add, Some(&results)),
            Err(EditError::MalformedResult {
                kind: EditKind::Add,
                index: 1,
                reason: "successful add carries no objectId".to_string()
            })
        );

        // Updates and deletes may be reported by global ID alone
        let outcomes = map_outcomes(EditKind::Delete, Some(&results)).unwrap();
        assert_eq!(outcomes[1].global_id(), Some("{A}"));
    }

    #[test]
    fn test_extract_added_ids_skips_failures() {
        let results = json!([
            {"success": true, "objectId": 10},
            {"success": false, "error": {"code": 1000, "description": "invalid"}},
            {"success": true, "objectId": 11}
        ]);
        assert_eq!(extract_added_ids(Some(&results)).unwrap(), vec![10, 11]);
        assert_eq!(extract_added_ids(None).unwrap(), Vec::<i64>::new());
    }

    proptest! {
        #[test]
        fn prop_outcomes_parallel_to_results(flags in proptest::collection::vec(any::<bool>(), 0..40)) {
            let results: Vec<Value> = flags
                .iter()
                .enumerate()
                .map(|(i, ok)| if *ok {
                    json!({"objectId": i, "success": true})
                } else {
                    json!({"objectId": i, "success": false, "error": {"code": 1, "description": "x"}})
                })
                .collect();
            let outcomes = map_outcomes(EditKind::Add, Some(&Value::Array(results))).unwrap();

            prop_assert_eq!(outcomes.len(), flags.len());
            for (i, (outcome, ok)) in outcomes.iter().zip(&flags).enumerate() {
                prop_assert_eq!(outcome.is_success(), *ok);
                prop_assert_eq!(outcome.object_id(), Some(i as i64));
            }

            let ids = added_ids(&outcomes);
            prop_assert_eq!(ids.len(), flags.iter().filter(|f| **f).count());
        }
    }
}
