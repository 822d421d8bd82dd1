//! Property value types for knowledge graph nodes
//!
//! Node properties are free-form (`level`, `started`, `url`, `status`, ...), so a
//! value is any JSON-shaped datum and maps keep insertion order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Property value type supporting multiple data types
///
/// Serialized untagged, so a property map round-trips as a plain JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<PropertyValue>),
    Map(IndexMap<String, PropertyValue>),
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            PropertyValue::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Numeric value; integers are widened
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            PropertyValue::Float(f) => Some(f),
            PropertyValue::Integer(i) => Some(i as f64),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match *self {
            PropertyValue::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<PropertyValue>> {
        match self {
            PropertyValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, PropertyValue>> {
        match self {
            PropertyValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Plain JSON form. Non-finite floats have no JSON form and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Any JSON value is a valid property; integers that fit `i64` stay integers.
    pub fn from_json(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or(PropertyValue::Null)
    }
}

impl fmt::Display for PropertyValue {
    /// Strings print bare; everything else prints as JSON
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => f.write_str(s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_owned())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(items: Vec<PropertyValue>) -> Self {
        PropertyValue::Array(items)
    }
}

/// Property map for storing node properties, in insertion order
pub type PropertyMap = IndexMap<String, PropertyValue>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(PropertyValue::from("beginner").to_string(), "beginner");
        assert_eq!(PropertyValue::from(12i64).to_string(), "12");
        assert_eq!(
            PropertyValue::from(vec!["a".into(), PropertyValue::Null]).to_string(),
            r#"["a",null]"#
        );
    }

    #[test]
    fn test_property_value_conversions() {
        let string_prop: PropertyValue = "hello".into();
        assert_eq!(string_prop.as_string(), Some("hello"));

        let int_prop: PropertyValue = 42i64.into();
        assert_eq!(int_prop.as_integer(), Some(42));
        assert_eq!(int_prop.as_float(), Some(42.0));

        let bool_prop: PropertyValue = true.into();
        assert_eq!(bool_prop.as_boolean(), Some(true));
    }

    #[test]
    fn test_untagged_deserialization() {
        let props: PropertyMap = serde_json::from_value(json!({
            "level": "beginner",
            "hours": 12,
            "rating": 4.5,
            "done": false,
            "tags": ["graphs", "math"],
            "notes": null
        }))
        .unwrap();

        assert_eq!(props["level"], PropertyValue::String("beginner".into()));
        assert_eq!(props["hours"], PropertyValue::Integer(12));
        assert_eq!(props["rating"], PropertyValue::Float(4.5));
        assert_eq!(props["done"], PropertyValue::Boolean(false));
        assert_eq!(props["tags"].as_array().unwrap().len(), 2);
        assert!(props["notes"].is_null());

        // Insertion order is preserved
        let keys: Vec<&str> = props.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["level", "hours", "rating", "done", "tags", "notes"]);
    }

    #[test]
    fn test_json_conversion() {
        let value = json!({"nested": {"a": [1, "two", 3.5]}});
        let prop = PropertyValue::from_json(&value);
        assert!(prop.as_map().unwrap().contains_key("nested"));
        assert_eq!(prop.to_json(), value);

        assert_eq!(PropertyValue::Float(f64::NAN).to_json(), serde_json::Value::Null);
        assert_eq!(PropertyValue::from_json(&json!(u64::MAX)).as_float(), Some(u64::MAX as f64));
    }
}
