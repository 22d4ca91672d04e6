//! payload.rs - Masking of nested JSON payloads.
//!
//! License: MIT OR APACHE 2.0

use serde_json::{Map, Value};

/// Anything that can mask a string can mask a JSON document.
///
/// Strings are masked; objects are rebuilt with masked keys and masked values
/// in their original order; arrays keep their order and length; numbers,
/// booleans and `null` pass through. When two keys mask to the same string,
/// the first key's position and the last key's value are kept.
pub trait PayloadMasker {
    fn mask_text(&self, text: &str) -> String;

    fn mask_payload(&self, payload: &Value) -> Value {
        match payload {
            Value::String(s) => Value::String(self.mask_text(s)),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.mask_payload(item)).collect())
            }
            Value::Object(map) => {
                let mut masked = Map::with_capacity(map.len());
                for (key, value) in map {
                    masked.insert(self.mask_text(key), self.mask_payload(value));
                }
                Value::Object(masked)
            }
            other => other.clone(),
        }
    }

    fn mask_payload_owned(&self, payload: Value) -> Value {
        match payload {
            Value::String(s) => Value::String(self.mask_text(&s)),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.mask_payload_owned(item))
                    .collect(),
            ),
            Value::Object(map) => {
                let mut masked = Map::with_capacity(map.len());
                for (key, value) in map {
                    masked.insert(self.mask_text(&key), self.mask_payload_owned(value));
                }
                Value::Object(masked)
            }
            other => other,
        }
    }
}
