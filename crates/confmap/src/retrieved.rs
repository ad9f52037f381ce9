use serde::de::DeserializeOwned;
use serde_yaml_ng::{Mapping, Value};

/// The fetched bytes could not be decoded as YAML configuration.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The document parsed, but its top level is not a mapping.
    #[error("expected a mapping at the top level, found {0}")]
    NotAMapping(&'static str),
}

/// A configuration fragment decoded from the bytes a provider fetched.
///
/// The value is opaque to providers. Callers merge or deserialize it as
/// they see fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieved {
    value: Value,
}

impl Retrieved {
    /// Decode raw bytes as a YAML mapping.
    ///
    /// An empty document decodes to an empty mapping rather than `null`.
    /// Scalars and sequences at the top level are rejected.
    pub fn from_yaml(bytes: &[u8]) -> Result<Self, DecodeError> {
        let value = match serde_yaml_ng::from_slice::<Value>(bytes)? {
            Value::Null => Value::Mapping(Mapping::new()),
            value @ Value::Mapping(_) => value,
            Value::Tagged(tagged) if tagged.value.is_mapping() => Value::Tagged(tagged),
            other => return Err(DecodeError::NotAMapping(describe(&other))),
        };
        Ok(Self { value })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        self.value.as_mapping()
    }

    /// True for an empty mapping, which is what an empty document decodes to.
    pub fn is_empty(&self) -> bool {
        self.value.as_mapping().is_some_and(Mapping::is_empty)
    }

    /// Deserialize the value into a typed configuration struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        Ok(serde_yaml_ng::from_value(self.value.clone())?)
    }

    /// Convert to JSON. Non-string mapping keys are rendered as YAML scalars.
    pub fn to_json(&self) -> serde_json::Value {
        yaml_to_json(&self.value)
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn yaml_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_json::Value::from(i)
            } else if let Some(u) = n.as_u64() {
                serde_json::Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(serde_json::Value::Null, serde_json::Value::Number)
            }
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(items) => serde_json::Value::Array(items.iter().map(yaml_to_json).collect()),
        Value::Mapping(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (key_to_string(k), yaml_to_json(v)))
                .collect(),
        ),
        Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn key_to_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_owned(),
        other => serde_yaml_ng::to_string(other)
            .map(|s| s.trim_end().to_owned())
            .unwrap_or_default(),
    }
}
