//! Field decoders that never fail.
//!
//! Events and VIPS bodies come from upstream systems that do not hold to a
//! schema. A field of the wrong type reads as absent instead of rejecting
//! the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A string, or `None` for null and any other JSON type.
pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// A string, or `""` for null and any other JSON type.
pub fn string_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_string(deserializer).map(Option::unwrap_or_default)
}

/// A nested record, or `None` when the value does not decode as one.
pub fn optional_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A nested record, or its default when the value does not decode as one.
pub fn record_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    optional_record(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Inner {
        name: String,
    }

    #[derive(Debug, Default, Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "optional_string")]
        label: Option<String>,
        #[serde(default, deserialize_with = "string_or_default")]
        kind: String,
        #[serde(default, deserialize_with = "optional_record")]
        inner: Option<Inner>,
        #[serde(default, deserialize_with = "record_or_default")]
        fallback: Inner,
    }

    fn decode(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn well_typed_fields_decode() {
        let record = decode(json!({
            "label": "a",
            "kind": "b",
            "inner": {"name": "c"},
            "fallback": {"name": "d"}
        }));
        assert_eq!(record.label.as_deref(), Some("a"));
        assert_eq!(record.kind, "b");
        assert_eq!(record.inner.unwrap().name, "c");
        assert_eq!(record.fallback.name, "d");
    }

    #[test]
    fn null_fields_read_as_absent() {
        let record = decode(json!({
            "label": null,
            "kind": null,
            "inner": null,
            "fallback": null
        }));
        assert!(record.label.is_none());
        assert_eq!(record.kind, "");
        assert!(record.inner.is_none());
        assert_eq!(record.fallback.name, "");
    }

    #[test]
    fn mistyped_fields_read_as_absent() {
        let record = decode(json!({
            "label": 42,
            "kind": ["x"],
            "inner": "not an object",
            "fallback": {"name": 7}
        }));
        assert!(record.label.is_none());
        assert_eq!(record.kind, "");
        assert!(record.inner.is_none());
        assert_eq!(record.fallback.name, "");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let record = decode(json!({}));
        assert!(record.label.is_none());
        assert_eq!(record.kind, "");
        assert!(record.inner.is_none());
    }
}
