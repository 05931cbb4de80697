//! Field schema of a target collection.
//!
//! The schema is used to normalize loosely-typed input records before they
//! are sent. It can be built programmatically or deserialized directly from
//! the service's layer definition JSON.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::model::IdMode;

/// Field types reported by the service (`esriFieldType*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum FieldType {
    #[serde(rename = "esriFieldTypeOID")]
    Oid,
    #[serde(rename = "esriFieldTypeGlobalID")]
    GlobalId,
    #[serde(rename = "esriFieldTypeGUID")]
    Guid,
    #[serde(rename = "esriFieldTypeSmallInteger")]
    SmallInteger,
    #[serde(rename = "esriFieldTypeInteger")]
    Integer,
    #[serde(rename = "esriFieldTypeBigInteger")]
    BigInteger,
    #[serde(rename = "esriFieldTypeSingle")]
    Single,
    #[serde(rename = "esriFieldTypeDouble")]
    Double,
    #[serde(rename = "esriFieldTypeString")]
    String,
    #[serde(rename = "esriFieldTypeDate")]
    Date,
    /// Geometry, blob, raster, XML and anything newer: passed through unchecked.
    #[serde(other)]
    Other,
}

impl FieldType {
    /// Returns true for fields whose value the service assigns on insert.
    pub fn is_server_assigned(self) -> bool {
        matches!(self, FieldType::Oid | FieldType::GlobalId)
    }
}

/// A single field definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default = "default_true")]
    pub editable: bool,
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
}

fn default_true() -> bool {
    true
}

impl Field {
    /// Creates a nullable, editable field with no default.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: true,
            editable: true,
            default_value: None,
        }
    }

    /// Marks the field as non-nullable.
    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the field as read-only.
    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Sets the value the service uses when the field is omitted.
    pub fn default_value(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Returns true if a create record must supply this field.
    pub fn is_required_on_create(&self) -> bool {
        !self.nullable
            && self.editable
            && !self.field_type.is_server_assigned()
            && self.default_value.as_ref().is_none_or(|v| v.is_null())
    }
}

/// Field schema of a target collection.
///
/// Field lookup is case-insensitive; normalized records always use the
/// schema's spelling of a field name.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "LayerDefinition")]
pub struct Schema {
    id_field: String,
    global_id_field: Option<String>,
    fields: Vec<Field>,
    index: FxHashMap<String, usize>,
}

impl Schema {
    /// Creates a schema whose identifier is the given object-ID field.
    pub fn new(id_field: impl Into<String>) -> Self {
        let id_field = id_field.into();
        let mut schema = Self {
            id_field: id_field.clone(),
            global_id_field: None,
            fields: Vec::new(),
            index: FxHashMap::default(),
        };
        schema.insert(Field::new(id_field, FieldType::Oid).required().read_only());
        schema
    }

    /// Adds a field (replacing any field with the same name).
    pub fn with_field(mut self, field: Field) -> Self {
        self.insert(field);
        self
    }

    /// Declares the global-ID field.
    pub fn with_global_id_field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.insert(Field::new(name.clone(), FieldType::GlobalId).required().read_only());
        self.global_id_field = Some(name);
        self
    }

    /// Returns the object-ID field.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Returns the field update records must carry under `mode`.
    ///
    /// The global-ID regime uses the global-ID field when the collection has
    /// one and falls back to the object-ID field otherwise.
    pub fn identifier_field(&self, mode: IdMode) -> &str {
        match (mode, self.global_id_field.as_deref()) {
            (IdMode::GlobalIds, Some(global_id)) => global_id,
            _ => &self.id_field,
        }
    }

    /// Returns the global-ID field, if the collection has one.
    pub fn global_id_field(&self) -> Option<&str> {
        self.global_id_field.as_deref()
    }

    /// Looks up a field by name, ignoring case.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&idx| &self.fields[idx])
    }

    /// Returns all fields in definition order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns true if `name` is the identifier field, ignoring case.
    pub fn is_id_field(&self, name: &str) -> bool {
        self.id_field.eq_ignore_ascii_case(name)
    }

    fn insert(&mut self, field: Field) {
        let key = field.name.to_ascii_lowercase();
        if let Some(&idx) = self.index.get(&key) {
            self.fields[idx] = field;
        } else {
            self.index.insert(key, self.fields.len());
            self.fields.push(field);
        }
    }
}

/// Layer definition JSON as returned by the service.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayerDefinition {
    #[serde(default)]
    object_id_field: Option<String>,
    #[serde(default)]
    global_id_field: Option<String>,
    #[serde(default)]
    fields: Vec<Field>,
}

impl TryFrom<LayerDefinition> for Schema {
    type Error = String;

    fn try_from(def: LayerDefinition) -> Result<Self, Self::Error> {
        let id_field = def
            .object_id_field
            .filter(|name| !name.is_empty())
            .or_else(|| {
                def.fields
                    .iter()
                    .find(|f| f.field_type == FieldType::Oid)
                    .map(|f| f.name.clone())
            })
            .ok_or_else(|| "layer definition has no object-ID field".to_string())?;

        let mut schema = Schema::new(id_field);
        for field in def.fields {
            schema.insert(field);
        }
        if let Some(name) = def.global_id_field.filter(|name| !name.is_empty()) {
            if schema.field(&name).is_none() {
                schema.insert(Field::new(name.clone(), FieldType::GlobalId).required().read_only());
            }
            schema.global_id_field = Some(name);
        }
        Ok(schema)
    }
}
