//! Record identifiers and the identifier regime of a batch.
//!
//! A feature is addressed either by its object ID, a service-local integer,
//! or by its global ID, a GUID that survives replication.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scalar record identifier as supplied by callers.
///
/// Integers are typically object IDs and strings are typically global IDs,
/// but the server is the final judge: the value is rendered according to
/// the batch's [`IdMode`], not according to its variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Integer(i64),
    String(String),
}

impl Identifier {
    /// Returns the integer value, if this is an integer identifier.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Identifier::Integer(v) => Some(*v),
            Identifier::String(_) => None,
        }
    }

    /// Returns the string value, if this is a string identifier.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Identifier::Integer(_) => None,
            Identifier::String(s) => Some(s),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Integer(v) => write!(f, "{v}"),
            Identifier::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(v: i64) -> Self {
        Identifier::Integer(v)
    }
}

impl From<&str> for Identifier {
    fn from(v: &str) -> Self {
        Identifier::String(v.to_string())
    }
}

impl From<String> for Identifier {
    fn from(v: String) -> Self {
        Identifier::String(v)
    }
}

/// Which identifier the service should use to address existing records.
///
/// Sent as the `useGlobalIds` flag and controls how delete references are
/// rendered: quoted under [`IdMode::GlobalIds`], bare under
/// [`IdMode::ObjectIds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdMode {
    #[default]
    GlobalIds,
    ObjectIds,
}

impl IdMode {
    /// Returns true if the global-ID regime is active.
    pub fn uses_global_ids(self) -> bool {
        matches!(self, IdMode::GlobalIds)
    }
}

/// Normalizes a GUID to the braced upper-case form the service stores,
/// e.g. `{550E8400-E29B-41D4-A716-446655440000}`.
///
/// Accepts braced or bare input, with or without hyphens, in any case.
/// Returns `None` if the input is not a GUID.
pub fn normalize_global_id(s: &str) -> Option<String> {
    let trimmed = s.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(trimmed);
    let uuid = Uuid::try_parse(inner).ok()?;
    let mut buf = Uuid::encode_buffer();
    let formatted = uuid.hyphenated().encode_upper(&mut buf);
    Some(format!("{{{formatted}}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_display_is_bare() {
        assert_eq!(Identifier::Integer(7).to_string(), "7");
        assert_eq!(Identifier::from("{ABC}").to_string(), "{ABC}");
    }

    #[test]
    fn test_identifier_accessors() {
        assert_eq!(Identifier::Integer(7).as_integer(), Some(7));
        assert_eq!(Identifier::Integer(7).as_str(), None);
        assert_eq!(Identifier::from("x".to_string()).as_str(), Some("x"));
        assert_eq!(Identifier::from("x").as_integer(), None);
    }

    #[test]
    fn test_identifier_untagged_serde() {
        let ids: Vec<Identifier> = serde_json::from_str(r#"[1, "two"]"#).unwrap();
        assert_eq!(ids, vec![Identifier::Integer(1), Identifier::String("two".into())]);
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[1,"two"]"#);
    }

    #[test]
    fn test_default_mode_is_global_ids() {
        assert_eq!(IdMode::default(), IdMode::GlobalIds);
        assert!(IdMode::GlobalIds.uses_global_ids());
        assert!(!IdMode::ObjectIds.uses_global_ids());
    }

    #[test]
    fn test_normalize_global_id_forms() {
        let expected = "{550E8400-E29B-41D4-A716-446655440000}";
        assert_eq!(
            normalize_global_id("550e8400-e29b-41d4-a716-446655440000").as_deref(),
            Some(expected)
        );
        assert_eq!(
            normalize_global_id("{550e8400-e29b-41d4-a716-446655440000}").as_deref(),
            Some(expected)
        );
        assert_eq!(
            normalize_global_id("550e8400e29b41d4a716446655440000").as_deref(),
            Some(expected)
        );
    }

    #[test]
    fn test_normalize_global_id_rejects_garbage() {
        assert!(normalize_global_id("not-a-guid").is_none());
        assert!(normalize_global_id("{}").is_none());
        assert!(normalize_global_id("").is_none());
    }
}
