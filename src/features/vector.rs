//! Ordered feature mapping

use crate::features::schema::{feature_keys, LINE_COUNT_KEY};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric feature value
///
/// Serialized as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Integer(i64),
    Float(f64),
}

impl FeatureValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            FeatureValue::Integer(v) => v as f64,
            FeatureValue::Float(v) => v,
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Float(value)
    }
}

impl From<u32> for FeatureValue {
    fn from(value: u32) -> Self {
        FeatureValue::Integer(value as i64)
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Integer(v) => write!(f, "{}", v),
            FeatureValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Feature key → value, in schema order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(IndexMap<String, FeatureValue>);

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every schema key present with its zero default
    pub fn with_schema_defaults() -> Self {
        let map = feature_keys()
            .iter()
            .map(|key| {
                let value = if key == LINE_COUNT_KEY {
                    FeatureValue::Integer(0)
                } else {
                    FeatureValue::Float(0.0)
                };
                (key.clone(), value)
            })
            .collect();
        Self(map)
    }

    /// Set a value; an existing key keeps its position
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FeatureValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<FeatureValue> {
        self.0.get(key).copied()
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).map(|v| v.as_f64())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FeatureValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values laid out along `names`, 0.0 for names not present
    pub fn aligned(&self, names: &[String]) -> Vec<f64> {
        names
            .iter()
            .map(|name| self.get_f64(name).unwrap_or(0.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::schema::FEATURE_COUNT;

    #[test]
    fn test_schema_defaults() {
        let vector = FeatureVector::with_schema_defaults();
        assert_eq!(vector.len(), FEATURE_COUNT);
        assert_eq!(vector.get(LINE_COUNT_KEY), Some(FeatureValue::Integer(0)));
        assert_eq!(vector.get("avg_hue"), Some(FeatureValue::Float(0.0)));
        assert!(vector.keys().eq(feature_keys().iter().map(String::as_str)));
    }

    #[test]
    fn test_set_keeps_position() {
        let mut vector = FeatureVector::with_schema_defaults();
        vector.set("wb_g", 1.02);
        vector.set(LINE_COUNT_KEY, 7u32);
        assert_eq!(vector.keys().nth(7), Some("wb_g"));
        assert_eq!(vector.get_f64("wb_g"), Some(1.02));
        assert_eq!(vector.get(LINE_COUNT_KEY), Some(FeatureValue::Integer(7)));
    }

    #[test]
    fn test_json_shape() {
        let mut vector = FeatureVector::new();
        vector.set("avg_hue", 12.5);
        vector.set("line_count", 3u32);
        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(json, r#"{"avg_hue":12.5,"line_count":3}"#);

        let back: FeatureVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vector);
    }

    #[test]
    fn test_aligned_fills_missing_with_zero() {
        let mut vector = FeatureVector::new();
        vector.set("a", 1.5);
        vector.set("b", 2u32);
        let names = vec!["b".to_string(), "missing".to_string(), "a".to_string()];
        assert_eq!(vector.aligned(&names), vec![2.0, 0.0, 1.5]);
    }
}
