//! Frame and field types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Scalar value carried by one output field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    /// String value
    String(String),

    /// Boolean value
    Bool(bool),
}

impl FieldValue {
    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&FieldValue> for Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Float(f) => Value::from(*f),
            FieldValue::String(s) => Value::from(s.clone()),
            FieldValue::Bool(b) => Value::from(*b),
        }
    }
}

/// One flattened output field: a dotted key path and its scalar value.
///
/// The field's positional index is its position in the owning frame's
/// field vector; flattening produces a stable order for the same payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatField {
    pub name: String,
    pub value: FieldValue,
}

impl FlatField {
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A single tabular record: three fixed system fields (event time, partition,
/// offset) followed by the flattened payload fields, one frame per message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Broker-assigned event time of the originating message
    pub event_time: DateTime<Utc>,
    /// Partition the message was read from
    pub partition: i32,
    /// Offset of the message within its partition
    pub offset: i64,
    /// Flattened payload fields, in flattening order
    pub fields: Vec<FlatField>,
}

impl Frame {
    pub fn new(event_time: DateTime<Utc>, partition: i32, offset: i64) -> Self {
        Self {
            event_time,
            partition,
            offset,
            fields: Vec::new(),
        }
    }

    /// Build a frame from a decoded payload object, flattening it beneath
    /// the system fields.
    pub fn from_object(
        event_time: DateTime<Utc>,
        partition: i32,
        offset: i64,
        payload: &Map<String, Value>,
    ) -> Self {
        let mut frame = Self::new(event_time, partition, offset);
        crate::flatten::flatten_json("", payload, &mut frame.fields);
        frame
    }

    pub fn push_field(&mut self, field: FlatField) {
        self.fields.push(field);
    }

    /// Render the frame as one flat JSON object with the system fields
    /// under their reserved `_`-prefixed names.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert(
            "_eventtime".to_string(),
            Value::from(self.event_time.to_rfc3339()),
        );
        object.insert("_partition".to_string(), Value::from(self.partition));
        object.insert("_offset".to_string(), Value::from(self.offset));
        for field in &self.fields {
            object.insert(field.name.clone(), Value::from(&field.value));
        }
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_accessors() {
        assert_eq!(FieldValue::Int(42).as_i64(), Some(42));
        assert_eq!(FieldValue::Float(3.5).as_f64(), Some(3.5));
        assert_eq!(FieldValue::String("x".to_string()).as_str(), Some("x"));
        assert_eq!(FieldValue::Bool(true).as_bool(), Some(true));

        // Cross-type conversions
        assert_eq!(FieldValue::Int(7).as_f64(), Some(7.0));
        assert_eq!(FieldValue::Bool(true).as_i64(), None);
    }

    #[test]
    fn test_frame_to_json_carries_system_fields() {
        let event_time = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let mut frame = Frame::new(event_time, 3, 1207);
        frame.push_field(FlatField::new("level", FieldValue::String("warn".to_string())));

        let json = frame.to_json();
        assert_eq!(json["_partition"], 3);
        assert_eq!(json["_offset"], 1207);
        assert_eq!(json["_eventtime"], event_time.to_rfc3339());
        assert_eq!(json["level"], "warn");
    }
}
