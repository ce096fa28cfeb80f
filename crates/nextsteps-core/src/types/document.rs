//! Schema-less document representation used by the document store.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::result::AppResult;

/// The field map of a stored document.
pub type Fields = Map<String, Value>;

/// Field name under which the marker for server-resolved timestamps is stored.
const SERVER_TIMESTAMP_MARKER: &str = "$serverTimestamp";

/// A document read back from a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier of the document within its collection.
    pub id: String,
    /// Stored fields (never contains `id`).
    pub fields: Fields,
}

impl Document {
    /// Create a document from an id and fields.
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Read a single field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Decode the document into a typed record, injecting the document id
    /// as the `id` field.
    pub fn decode<T: DeserializeOwned>(&self) -> AppResult<T> {
        let mut fields = self.fields.clone();
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(fields)).map_err(|e| {
            AppError::with_source(
                crate::error::ErrorKind::Serialization,
                format!("Malformed document '{}'", self.id),
                e,
            )
        })
    }
}

/// Serialize a record into a field map, dropping any `id` field since
/// the document id lives outside the fields.
pub fn to_fields<T: Serialize>(value: &T) -> AppResult<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            map.remove("id");
            Ok(map)
        }
        other => Err(AppError::validation(format!(
            "Documents must serialize to an object, got {other}"
        ))),
    }
}

/// A write-time marker the store replaces with its own clock reading
/// (epoch milliseconds).
pub fn server_timestamp() -> Value {
    let mut map = Map::new();
    map.insert(SERVER_TIMESTAMP_MARKER.to_string(), Value::Bool(true));
    Value::Object(map)
}

/// Whether a value is the server timestamp marker.
pub fn is_server_timestamp(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|m| m.len() == 1 && m.get(SERVER_TIMESTAMP_MARKER) == Some(&Value::Bool(true)))
}

/// Replace every top-level server timestamp marker with `now_millis`.
pub fn resolve_server_timestamps(fields: &mut Fields, now_millis: i64) {
    for value in fields.values_mut() {
        if is_server_timestamp(value) {
            *value = Value::from(now_millis);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        id: String,
        name: String,
    }

    #[test]
    fn test_decode_injects_id() {
        let doc = Document::new("abc", json!({"name": "Ann"}).as_object().cloned().unwrap());
        let sample: Sample = doc.decode().unwrap();
        assert_eq!(sample.id, "abc");
        assert_eq!(sample.name, "Ann");
    }

    #[test]
    fn test_to_fields_strips_id() {
        let fields = to_fields(&Sample {
            id: "abc".into(),
            name: "Ann".into(),
        })
        .unwrap();
        assert!(!fields.contains_key("id"));
        assert_eq!(fields.get("name"), Some(&json!("Ann")));
    }

    #[test]
    fn test_server_timestamp_resolution() {
        let mut fields = Fields::new();
        fields.insert("createdAt".into(), server_timestamp());
        fields.insert("title".into(), json!("Face up aisle 4"));
        resolve_server_timestamps(&mut fields, 42);
        assert_eq!(fields.get("createdAt"), Some(&json!(42)));
        assert_eq!(fields.get("title"), Some(&json!("Face up aisle 4")));
    }
}
