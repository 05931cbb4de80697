//! The remote collection receiving edits, and a read-only preview of the
//! edits pending against it.

use serde::Serialize;

use crate::model::{CreateRecord, Identifier, UpdateRecord};

/// Identifies a remote feature collection (a layer of a feature service).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetCollection {
    /// Layer index within the service.
    pub id: u32,
    /// Layer URL; edit endpoints are resolved relative to it.
    pub url: String,
    /// URL of the service hosting the layer.
    pub service_url: String,
    /// Display name.
    pub name: String,
}

impl TargetCollection {
    /// Creates a target from a layer URL such as
    /// `https://host/arcgis/rest/services/Parcels/FeatureServer/0`.
    ///
    /// The service URL is the layer URL without its trailing `/<id>` segment.
    pub fn new(id: u32, url: impl Into<String>, name: impl Into<String>) -> Self {
        let url = url.into().trim_end_matches('/').to_string();
        let suffix = format!("/{id}");
        let service_url = url.strip_suffix(&suffix).unwrap_or(&url).to_string();
        Self {
            id,
            url,
            service_url,
            name: name.into(),
        }
    }

    /// Overrides the derived service URL.
    pub fn with_service_url(mut self, service_url: impl Into<String>) -> Self {
        self.service_url = service_url.into();
        self
    }

    /// Resolves an endpoint below the layer URL.
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.url, name)
    }
}

/// Preview of an edit batch, for logging or display without submitting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPreview<'a> {
    pub url: &'a str,
    pub service_url: &'a str,
    pub name: &'a str,
    pub payload: PendingEdits<'a>,
}

/// The pending buckets of a batch. Empty buckets are `None`, never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingEdits<'a> {
    pub id: u32,
    pub adds: Option<&'a [CreateRecord]>,
    pub updates: Option<&'a [UpdateRecord]>,
    pub deletes: Option<&'a [Identifier]>,
}
