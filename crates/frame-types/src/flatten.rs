//! Payload flattening.
//!
//! Converts an arbitrarily nested JSON object into a flat list of scalar
//! fields with dotted key paths. Keys are visited in lexicographic order at
//! every nesting level, so the same logical payload always produces the same
//! field order regardless of how the document was keyed on the wire.

use crate::record::{FieldValue, FlatField};
use serde_json::{Map, Value};
use tracing::warn;

/// Flatten `object` into `fields`, prefixing every key path with `prefix`.
///
/// Nested objects recurse with an extended prefix; arrays are rendered as a
/// single string field holding their JSON text and are never recursed into.
/// Values with no tabular representation (null, numbers outside the i64/f64
/// range) are dropped with a warning; nothing here is fatal.
pub fn flatten_json(prefix: &str, object: &Map<String, Value>, fields: &mut Vec<FlatField>) {
    let mut keys: Vec<&String> = object.keys().collect();
    keys.sort();

    for key in keys {
        let value = &object[key];
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    fields.push(FlatField::new(full_key, FieldValue::Int(i)));
                } else if let Some(f) = n.as_f64() {
                    fields.push(FlatField::new(full_key, FieldValue::Float(f)));
                } else {
                    warn!(key = %full_key, "ignoring number with no tabular representation");
                }
            }
            Value::String(s) => {
                fields.push(FlatField::new(full_key, FieldValue::String(s.clone())));
            }
            Value::Bool(b) => {
                fields.push(FlatField::new(full_key, FieldValue::Bool(*b)));
            }
            Value::Object(nested) => flatten_json(&full_key, nested, fields),
            Value::Array(_) => {
                // A textual rendering, one field per array
                fields.push(FlatField::new(full_key, FieldValue::String(value.to_string())));
            }
            Value::Null => {
                warn!(key = %full_key, "ignoring unsupported data type");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten_str(payload: &str) -> Vec<FlatField> {
        let object: Map<String, Value> = serde_json::from_str(payload).expect("test payload");
        let mut fields = Vec::new();
        flatten_json("", &object, &mut fields);
        fields
    }

    #[test]
    fn test_scalars_keep_their_kind() {
        let fields = flatten_str(r#"{"a": 1, "b": {"c": "x", "d": true}}"#);

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "a");
        assert_eq!(fields[0].value, FieldValue::Int(1));
        assert_eq!(fields[1].name, "b.c");
        assert_eq!(fields[1].value, FieldValue::String("x".to_string()));
        assert_eq!(fields[2].name, "b.d");
        assert_eq!(fields[2].value, FieldValue::Bool(true));
    }

    #[test]
    fn test_floats_stay_floats() {
        let fields = flatten_str(r#"{"temperature": 21.5}"#);
        assert_eq!(fields[0].value, FieldValue::Float(21.5));
    }

    #[test]
    fn test_keys_sorted_at_every_level() {
        let fields = flatten_str(r#"{"z": 1, "a": {"y": 2, "b": 3}, "m": 4}"#);

        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.b", "a.y", "m", "z"]);
    }

    #[test]
    fn test_leaf_paths_match_input() {
        let fields = flatten_str(r#"{"a": {"b": {"c": 1}}, "d": 2}"#);

        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.b.c", "d"]);
    }

    #[test]
    fn test_arrays_become_one_string_field() {
        let fields = flatten_str(r#"{"a": [1, 2, 3]}"#);

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "a");
        assert_eq!(fields[0].value, FieldValue::String("[1,2,3]".to_string()));
    }

    #[test]
    fn test_array_of_objects_is_not_recursed() {
        let fields = flatten_str(r#"{"items": [{"id": 1}]}"#);

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "items");
        assert!(fields[0].value.as_str().unwrap().contains("\"id\""));
    }

    #[test]
    fn test_null_fields_are_dropped() {
        let fields = flatten_str(r#"{"a": null, "b": 2}"#);

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "b");
        assert_eq!(fields[0].value, FieldValue::Int(2));
    }

    #[test]
    fn test_empty_object_produces_no_fields() {
        assert!(flatten_str("{}").is_empty());
    }

    #[test]
    fn test_prefix_applies_to_root_keys() {
        let object: Map<String, Value> =
            serde_json::from_str(r#"{"inner": 1}"#).expect("test payload");
        let mut fields = Vec::new();
        flatten_json("outer", &object, &mut fields);

        assert_eq!(fields[0].name, "outer.inner");
    }
}
