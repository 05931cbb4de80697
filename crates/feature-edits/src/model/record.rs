//! Normalized pending records.
//!
//! These are the shapes the service expects inside the `adds` and `updates`
//! payloads: `{"attributes": {...}, "geometry": {...}}`, with the geometry
//! key omitted when absent.

use serde::Serialize;

use crate::model::Identifier;

/// Attribute mapping of a feature, keyed by schema field name.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// A record to be created. Carries no identifier; the service assigns one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRecord {
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<serde_json::Value>,
}

/// A record to be updated, addressed by the schema's identifier field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateRecord {
    /// Value of the identifier field, also present in `attributes`.
    #[serde(skip)]
    pub id: Identifier,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<serde_json::Value>,
}
