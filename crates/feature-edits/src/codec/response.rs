//! Decoding of edit responses.

use serde_json::Value;

use crate::error::EditError;
use crate::transport::Response;

/// The raw result arrays of an edit response.
///
/// Each array is left undecoded so that [`map_outcomes`](crate::map_outcomes)
/// can report malformed entries by position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditResults {
    pub add_results: Option<Value>,
    pub update_results: Option<Value>,
    pub delete_results: Option<Value>,
}

/// Extracts the result arrays from a response.
///
/// Fails with [`EditError::MalformedResponse`] if the response has no
/// `data` object, and with [`EditError::Service`] if the service answered
/// with a top-level `error` instead of results.
pub fn decode_edit_results(response: Response) -> Result<EditResults, EditError> {
    let data = match response.data {
        Some(Value::Object(data)) => data,
        _ => return Err(EditError::MalformedResponse { context: "data" }),
    };

    if let Some(error) = data.get("error") {
        return Err(service_error(error));
    }

    let mut data = data;
    Ok(EditResults {
        add_results: data.remove("addResults"),
        update_results: data.remove("updateResults"),
        delete_results: data.remove("deleteResults"),
    })
}

fn service_error(error: &Value) -> EditError {
    let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
    let mut message = error
        .get("message")
        .or_else(|| error.get("description"))
        .and_then(Value::as_str)
        .unwrap_or("unknown service error")
        .to_string();

    let details: Vec<&str> = error
        .get("details")
        .and_then(Value::as_array)
        .map(|d| d.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if !details.is_empty() {
        message = format!("{message} ({})", details.join("; "));
    }

    EditError::Service { code, message }
}
