//! Normalization of loosely-typed input records.
//!
//! Input records are JSON objects, either flat (`{"name": "A", "geometry": {...}}`)
//! or nested (`{"attributes": {...}, "geometry": {...}}`). They are mapped
//! through the [`Schema`] into the shape the service expects.
//!
//! Attribute policy:
//! - Attributes that are not schema fields are dropped.
//! - Read-only fields are dropped, except the identifier field on updates
//!   and the global-ID field.
//! - The object-ID field is dropped from creates; the service assigns it.
//! - Field names are matched ignoring case and emitted in schema spelling.
//! - Values must match the field type. GUIDs are normalized to the braced
//!   upper-case form.
//!
//! All functions are pure and preserve input order.

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::ValidationError;
use crate::model::{
    Attributes, CreateRecord, Field, FieldType, IdMode, Identifier, Schema, UpdateRecord,
    normalize_global_id,
};

const ATTRIBUTES_KEY: &str = "attributes";
const GEOMETRY_KEY: &str = "geometry";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    Create,
    Update,
}

/// A record split into its attribute map and geometry.
struct RawRecord<'a> {
    attributes: &'a Map<String, Value>,
    geometry: Option<&'a Value>,
    /// Flat records carry the geometry alongside the attributes.
    flat: bool,
}

/// Normalizes records for the `adds` payload.
///
/// Fails if a record is not an object, has a non-object geometry, carries a
/// value of the wrong type, or lacks a field the schema requires on create.
pub fn normalize_create(
    records: &[Value],
    schema: &Schema,
) -> Result<Vec<CreateRecord>, ValidationError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let raw = split_record(index, record)?;
            let attributes = normalize_attributes(index, &raw, schema, Purpose::Create)?;

            for field in schema.fields() {
                if field.is_required_on_create() && !attributes.contains_key(&field.name) {
                    return Err(ValidationError::MissingRequiredField {
                        index,
                        field: field.name.clone(),
                    });
                }
            }

            Ok(CreateRecord {
                attributes,
                geometry: raw.geometry.cloned(),
            })
        })
        .collect()
}

/// Normalizes records for the `updates` payload.
///
/// Same as [`normalize_create`] minus the required-field check, plus every
/// record must carry a non-null value for the identifier field of `mode`
/// (see [`Schema::identifier_field`]).
pub fn normalize_update(
    records: &[Value],
    schema: &Schema,
    mode: IdMode,
) -> Result<Vec<UpdateRecord>, ValidationError> {
    let id_field = schema.identifier_field(mode);

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let raw = split_record(index, record)?;

            let has_id = raw
                .attributes
                .iter()
                .any(|(key, value)| key.eq_ignore_ascii_case(id_field) && !value.is_null());
            if !has_id {
                return Err(ValidationError::MissingIdentifier {
                    index,
                    field: id_field.to_string(),
                });
            }

            let attributes = normalize_attributes(index, &raw, schema, Purpose::Update)?;
            let id = update_identifier(index, &attributes, schema, mode)?;

            Ok(UpdateRecord {
                id,
                attributes,
                geometry: raw.geometry.cloned(),
            })
        })
        .collect()
}

/// Reads the identifier of an already-normalized update under `mode`.
///
/// Used again at submission time, since the regime may have changed after
/// the record was accumulated.
pub fn update_identifier(
    index: usize,
    attributes: &Attributes,
    schema: &Schema,
    mode: IdMode,
) -> Result<Identifier, ValidationError> {
    let id_field = schema.identifier_field(mode);
    let key = schema.field(id_field).map_or(id_field, |f| f.name.as_str());

    attributes
        .get(key)
        .and_then(scalar_identifier)
        .ok_or_else(|| ValidationError::MissingIdentifier {
            index,
            field: id_field.to_string(),
        })
}

/// Validates delete references.
///
/// Each must be an integer or a non-empty string without `,` or `"`, which
/// would split or unbalance the rendered list. Under [`IdMode::ObjectIds`]
/// strings must also parse as integers and are converted to integers.
pub fn normalize_delete(ids: &[Value], mode: IdMode) -> Result<Vec<Identifier>, ValidationError> {
    ids.iter()
        .enumerate()
        .map(|(index, value)| {
            let id = scalar_identifier(value).ok_or(ValidationError::InvalidIdentifier {
                index,
                found: json_kind(value),
            })?;
            check_delete_reference(index, &id, mode)?;

            Ok(match id {
                Identifier::String(s) if mode == IdMode::ObjectIds => {
                    s.parse().map_or(Identifier::String(s), Identifier::Integer)
                }
                id => id,
            })
        })
        .collect()
}

/// Checks a delete reference can be rendered unambiguously under `mode`.
pub fn check_delete_reference(
    index: usize,
    id: &Identifier,
    mode: IdMode,
) -> Result<(), ValidationError> {
    let Identifier::String(s) = id else {
        return Ok(());
    };
    let found = if s.contains([',', '"']) {
        "string containing ',' or '\"'"
    } else if mode == IdMode::ObjectIds && s.parse::<i64>().is_err() {
        "non-integer string"
    } else {
        return Ok(());
    };
    Err(ValidationError::InvalidIdentifier { index, found })
}

fn scalar_identifier(value: &Value) -> Option<Identifier> {
    match value {
        Value::Number(n) => n.as_i64().map(Identifier::Integer),
        Value::String(s) if !s.is_empty() => Some(Identifier::String(s.clone())),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "non-integer number",
        Value::String(_) => "empty string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn split_record(index: usize, record: &Value) -> Result<RawRecord<'_>, ValidationError> {
    let object = record
        .as_object()
        .ok_or(ValidationError::NotAnObject { index })?;

    let (attributes, flat) = match object.get(ATTRIBUTES_KEY) {
        Some(Value::Object(nested)) => (nested, false),
        _ => (object, true),
    };

    let geometry = match object.get(GEOMETRY_KEY) {
        None | Some(Value::Null) => None,
        Some(g @ Value::Object(_)) => Some(g),
        Some(_) => return Err(ValidationError::InvalidGeometry { index }),
    };

    Ok(RawRecord {
        attributes,
        geometry,
        flat,
    })
}

fn normalize_attributes(
    index: usize,
    raw: &RawRecord<'_>,
    schema: &Schema,
    purpose: Purpose,
) -> Result<Attributes, ValidationError> {
    let mut out = Attributes::new();

    for (key, value) in raw.attributes {
        let Some(field) = schema.field(key) else {
            if !(raw.flat && key == GEOMETRY_KEY) {
                trace!(index, attribute = %key, "dropping attribute not in schema");
            }
            continue;
        };
        if !is_writable(field, schema, purpose) {
            trace!(index, attribute = %key, "dropping read-only attribute");
            continue;
        }
        let value = check_value(index, field, value)?;
        out.insert(field.name.clone(), value);
    }

    Ok(out)
}

fn is_writable(field: &Field, schema: &Schema, purpose: Purpose) -> bool {
    match field.field_type {
        FieldType::GlobalId => true,
        FieldType::Oid if purpose == Purpose::Create => false,
        _ if purpose == Purpose::Update && schema.is_id_field(&field.name) => true,
        _ => field.editable,
    }
}

fn check_value(index: usize, field: &Field, value: &Value) -> Result<Value, ValidationError> {
    if value.is_null() {
        return if field.nullable {
            Ok(Value::Null)
        } else {
            Err(ValidationError::NullNotAllowed {
                index,
                field: field.name.clone(),
            })
        };
    }

    let mismatch = || ValidationError::TypeMismatch {
        index,
        field: field.name.clone(),
        expected: field.field_type,
    };

    match field.field_type {
        FieldType::Oid | FieldType::SmallInteger | FieldType::Integer | FieldType::BigInteger => {
            value.as_i64().map(|_| value.clone()).ok_or_else(mismatch)
        }
        FieldType::Single | FieldType::Double => {
            if value.is_number() {
                Ok(value.clone())
            } else {
                Err(mismatch())
            }
        }
        FieldType::String => {
            if value.is_string() {
                Ok(value.clone())
            } else {
                Err(mismatch())
            }
        }
        FieldType::Date => {
            if value.is_i64() || value.is_string() {
                Ok(value.clone())
            } else {
                Err(mismatch())
            }
        }
        FieldType::Guid | FieldType::GlobalId => {
            let s = value.as_str().ok_or_else(mismatch)?;
            normalize_global_id(s)
                .map(Value::String)
                .ok_or_else(|| ValidationError::InvalidGlobalId {
                    index,
                    field: field.name.clone(),
                    value: s.to_string(),
                })
        }
        FieldType::Other => Ok(value.clone()),
    }
}
