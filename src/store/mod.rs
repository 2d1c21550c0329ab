//! Key-value store seam.
//!
//! Records live in hashes whose field values are JSON-encoded, with one
//! membership set per entity type. Besides plain hash/set commands the store
//! offers two atomic primitives that the rental lifecycle relies on: a
//! compare-and-set on a single hash field and a clamped unit step on a counter
//! field.

pub mod memory;
pub mod redis;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Result of an atomic counter step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterOutcome {
    /// Counter moved from `from` to `to`; equal values mean the step was clamped
    Changed { from: i64, to: i64 },
    /// A take was refused because the counter is already at zero
    Exhausted,
    /// The hash does not exist
    Missing,
}

/// Result of a bounded hash write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundedWrite {
    Written,
    /// The merged record would put the counter above its cap; nothing written
    Rejected,
    Missing,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn ping(&self) -> AppResult<()>;

    /// All fields of a hash; empty when the key does not exist
    async fn hgetall(&self, key: &str) -> AppResult<HashMap<String, String>>;

    async fn hset(&self, key: &str, fields: Vec<(String, String)>) -> AppResult<()>;

    /// Returns whether the key existed
    async fn del(&self, key: &str) -> AppResult<bool>;

    async fn exists(&self, key: &str) -> AppResult<bool>;

    async fn sadd(&self, set: &str, member: &str) -> AppResult<()>;

    async fn srem(&self, set: &str, member: &str) -> AppResult<()>;

    async fn smembers(&self, set: &str) -> AppResult<Vec<String>>;

    /// Set `field` to `new` only if it currently equals `expected`
    async fn hcompare_and_set(
        &self,
        key: &str,
        field: &str,
        expected: &str,
        new: &str,
    ) -> AppResult<bool>;

    /// Decrement `field` by one unless it is already zero
    async fn htake_unit(&self, key: &str, field: &str) -> AppResult<CounterOutcome>;

    /// Increment `field` by one, never past the value of `cap_field`
    async fn hrestore_unit(&self, key: &str, field: &str, cap_field: &str)
        -> AppResult<CounterOutcome>;

    /// Write `fields` into an existing hash only if, once merged, `field`
    /// stays at or below `cap_field`
    async fn hset_bounded(
        &self,
        key: &str,
        fields: Vec<(String, String)>,
        field: &str,
        cap_field: &str,
    ) -> AppResult<BoundedWrite>;
}

/// Encode a record (or a partial update) as hash fields.
///
/// `None` values are dropped so partial updates only touch provided fields.
pub fn encode_fields<T: Serialize>(record: &T) -> AppResult<Vec<(String, String)>> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(field, value)| (field, value.to_string()))
            .collect()),
        other => Err(AppError::Internal(format!(
            "Cannot store non-object value {}",
            other
        ))),
    }
}

/// Encode one field value the same way `encode_fields` does
pub fn encode_value<T: Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decode one stored field value, with the same plain-string fallback as
/// `decode_fields`
pub fn decode_value<T: DeserializeOwned>(raw: &str) -> AppResult<T> {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(_) => Value::String(raw.to_string()),
    };
    Ok(serde_json::from_value(value)?)
}

/// Decode hash fields back into a record.
///
/// Values that are not valid JSON are taken as plain strings, which covers
/// records written by older clients.
pub fn decode_fields<T: DeserializeOwned>(fields: HashMap<String, String>) -> AppResult<T> {
    let map: Map<String, Value> = fields
        .into_iter()
        .map(|(field, raw)| {
            let value = match serde_json::from_str::<Value>(&raw) {
                Ok(value) => value,
                Err(_) => Value::String(raw),
            };
            (field, value)
        })
        .collect();
    Ok(serde_json::from_value(Value::Object(map))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        name: String,
        stock: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
    }

    #[test]
    fn encodes_values_as_json() {
        let fields = encode_fields(&Sample {
            name: "Dome Tent".into(),
            stock: 5,
            image_url: None,
        })
        .unwrap();
        let fields: HashMap<_, _> = fields.into_iter().collect();
        assert_eq!(fields["name"], "\"Dome Tent\"");
        assert_eq!(fields["stock"], "5");
        assert!(!fields.contains_key("imageUrl"));
    }

    #[test]
    fn decodes_plain_strings_from_older_writers() {
        let fields = HashMap::from([
            ("name".to_string(), "Dome Tent".to_string()),
            ("stock".to_string(), "5".to_string()),
        ]);
        let sample: Sample = decode_fields(fields).unwrap();
        assert_eq!(sample.name, "Dome Tent");
        assert_eq!(sample.stock, 5);
        assert_eq!(sample.image_url, None);
    }
}
