// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::rules::is_interpolated;

/// Parsed attributes of one resource.
///
/// Follows the analysis-host convention of wrapping every single-valued
/// attribute in a one-element list (`{"name": ["kv-x"]}`). Bare values are
/// accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceConf(Map<String, Value>);

/// Unwrap a one-element list to its only item
pub fn unwrap_single(value: &Value) -> &Value {
    match value {
        Value::Array(items) if items.len() == 1 => &items[0],
        other => other,
    }
}

/// Numeric reading of an attribute value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Known(f64),
    /// Interpolated, resolved only at apply time
    Unknown,
    /// Present but not a number
    Invalid,
}

impl Number {
    pub fn from_value(value: &Value) -> Self {
        match unwrap_single(value) {
            Value::Number(n) => n.as_f64().map(Number::Known).unwrap_or(Number::Invalid),
            Value::String(s) if is_interpolated(s) => Number::Unknown,
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Number::Known)
                .unwrap_or(Number::Invalid),
            _ => Number::Invalid,
        }
    }

    /// Whether the value satisfies `>= min`; unknown values are not judged
    pub fn at_least(&self, min: i64) -> bool {
        match self {
            Number::Known(n) => *n >= min as f64,
            Number::Unknown => true,
            Number::Invalid => false,
        }
    }
}

/// Truthiness of a flag attribute
pub fn is_truthy(value: &Value) -> bool {
    match unwrap_single(value) {
        Value::Bool(b) => *b,
        Value::String(s) => is_interpolated(s) || s.eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

impl ResourceConf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, wrapping it in the host's one-element list
    pub fn with(mut self, attribute: impl Into<String>, value: Value) -> Self {
        self.0.insert(attribute.into(), Value::Array(vec![value]));
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.0.contains_key(attribute)
    }

    /// Attribute value with the one-element list unwrapped
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.0.get(attribute).map(unwrap_single)
    }

    pub fn get_str(&self, attribute: &str) -> Option<&str> {
        self.get(attribute).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for ResourceConf {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_host_convention_unwraps() {
        let conf = ResourceConf::from_json(r#"{"name": ["bidone-kv-dev-001"]}"#).unwrap();
        assert_eq!(conf.get_str("name"), Some("bidone-kv-dev-001"));
    }

    #[test]
    fn test_bare_values_accepted() {
        let conf = ResourceConf::from_json(r#"{"name": "bidone-kv-dev-001"}"#).unwrap();
        assert_eq!(conf.get_str("name"), Some("bidone-kv-dev-001"));
    }

    #[test]
    fn test_multi_element_list_is_kept() {
        let conf = ResourceConf::from_json(r#"{"ip_rules": ["10.0.0.1", "10.0.0.2"]}"#).unwrap();
        assert_eq!(conf.get("ip_rules"), Some(&json!(["10.0.0.1", "10.0.0.2"])));
    }

    #[test]
    fn test_with_wraps_value() {
        let conf = ResourceConf::new().with("sku_name", json!("standard"));
        assert!(conf.contains("sku_name"));
        assert_eq!(conf.get_str("sku_name"), Some("standard"));
        assert_eq!(conf.len(), 1);
    }

    #[test]
    fn test_number_readings() {
        assert_eq!(Number::from_value(&json!([7])), Number::Known(7.0));
        assert_eq!(Number::from_value(&json!("14")), Number::Known(14.0));
        assert_eq!(Number::from_value(&json!("${var.days}")), Number::Unknown);
        assert_eq!(Number::from_value(&json!("seven")), Number::Invalid);
        assert!(Number::Known(7.0).at_least(7));
        assert!(!Number::Known(6.0).at_least(7));
        assert!(!Number::Invalid.at_least(0));
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!([true])));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("true")));
        assert!(!is_truthy(&json!("false")));
        assert!(is_truthy(&json!("${var.https_only}")));
        assert!(!is_truthy(&json!(null)));
    }
}
