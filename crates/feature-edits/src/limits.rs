//! Endpoint names and fixed request parameters of the feature service.

/// Layer endpoint that applies adds, updates and deletes in one request.
pub const APPLY_EDITS_ENDPOINT: &str = "applyEdits";

/// Layer endpoint that deletes records selected by a filter expression.
pub const DELETE_FEATURES_ENDPOINT: &str = "deleteFeatures";

/// Value of the `f` parameter on every request.
pub const RESPONSE_FORMAT: &str = "json";

/// Value of `rollbackOnFailure` on apply-edits requests. Partial success is
/// permitted: valid records are applied even when siblings are rejected.
pub const ROLLBACK_ON_FAILURE: bool = false;
