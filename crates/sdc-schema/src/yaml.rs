//! YAML to JSON value conversion.
//!
//! Schema descriptions and catalog documents may be written in YAML, but the
//! registry and validator operate on `serde_json::Value` trees. Only the
//! JSON-compatible subset of YAML is accepted: tags are dropped, map keys
//! must be strings, and non-finite floats are rejected.

use serde_json::Value;
use thiserror::Error;

/// A YAML value with no JSON equivalent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("YAML-to-JSON conversion failed: {0}")]
pub struct YamlConversionError(pub String);

/// Parse a YAML string and convert it to a JSON value tree.
pub fn yaml_str_to_json_value(content: &str) -> Result<Value, YamlConversionError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| YamlConversionError(format!("invalid YAML: {e}")))?;
    yaml_to_json_value(&yaml)
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Map keys must be YAML strings. Catalog field names are strings, so a
/// numeric or boolean key (`1:`, `true:`) is reported here rather than
/// being renamed into a key the validator would then flag as unknown.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, YamlConversionError> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => number(n)?,
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(seq) => Value::Array(seq.iter().map(yaml_to_json_value).collect::<Result<_, _>>()?),
        Yaml::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                let Yaml::String(key) = key else {
                    return Err(YamlConversionError(format!("map key must be a string, found {key:?}")));
                };
                object.insert(key.clone(), yaml_to_json_value(value)?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_to_json_value(&tagged.value)?,
    })
}

fn number(n: &serde_yaml::Number) -> Result<Value, YamlConversionError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::from(u));
    }
    n.as_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| YamlConversionError(format!("number {n} has no JSON representation")))
}
