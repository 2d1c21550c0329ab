//! In-process store with the same semantics as the Redis backend.
//!
//! Used by the test suite and for running the server without Redis
//! (`store.backend = "memory"`). Every operation runs under one lock, which
//! makes the compare-and-set and counter steps atomic.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{BoundedWrite, CounterOutcome, KvStore};
use crate::error::AppResult;

#[derive(Default)]
struct State {
    hashes: HashMap<String, HashMap<String, String>>,
    sets: HashMap<String, BTreeSet<String>>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn counter(hash: &HashMap<String, String>, field: &str) -> i64 {
    hash.get(field)
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or(0)
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> AppResult<HashMap<String, String>> {
        let state = self.state.lock().await;
        Ok(state.hashes.get(key).cloned().unwrap_or_default())
    }

    async fn hset(&self, key: &str, fields: Vec<(String, String)>) -> AppResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut state = self.state.lock().await;
        state.hashes.entry(key.to_string()).or_default().extend(fields);
        Ok(())
    }

    async fn del(&self, key: &str) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let hash = state.hashes.remove(key).is_some();
        let set = state.sets.remove(key).is_some();
        Ok(hash || set)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let state = self.state.lock().await;
        Ok(state.hashes.contains_key(key) || state.sets.contains_key(key))
    }

    async fn sadd(&self, set: &str, member: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .sets
            .entry(set.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(())
    }

    async fn srem(&self, set: &str, member: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(members) = state.sets.get_mut(set) {
            members.remove(member);
            if members.is_empty() {
                state.sets.remove(set);
            }
        }
        Ok(())
    }

    async fn smembers(&self, set: &str) -> AppResult<Vec<String>> {
        let state = self.state.lock().await;
        Ok(state
            .sets
            .get(set)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn hcompare_and_set(
        &self,
        key: &str,
        field: &str,
        expected: &str,
        new: &str,
    ) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.hashes.get_mut(key) {
            Some(hash) if hash.get(field).map(String::as_str) == Some(expected) => {
                hash.insert(field.to_string(), new.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn htake_unit(&self, key: &str, field: &str) -> AppResult<CounterOutcome> {
        let mut state = self.state.lock().await;
        let Some(hash) = state.hashes.get_mut(key) else {
            return Ok(CounterOutcome::Missing);
        };
        let current = counter(hash, field);
        if current <= 0 {
            return Ok(CounterOutcome::Exhausted);
        }
        hash.insert(field.to_string(), (current - 1).to_string());
        Ok(CounterOutcome::Changed {
            from: current,
            to: current - 1,
        })
    }

    async fn hrestore_unit(
        &self,
        key: &str,
        field: &str,
        cap_field: &str,
    ) -> AppResult<CounterOutcome> {
        let mut state = self.state.lock().await;
        let Some(hash) = state.hashes.get_mut(key) else {
            return Ok(CounterOutcome::Missing);
        };
        let current = counter(hash, field);
        let updated = (current + 1).min(counter(hash, cap_field)).max(0);
        hash.insert(field.to_string(), updated.to_string());
        Ok(CounterOutcome::Changed {
            from: current,
            to: updated,
        })
    }

    async fn hset_bounded(
        &self,
        key: &str,
        fields: Vec<(String, String)>,
        field: &str,
        cap_field: &str,
    ) -> AppResult<BoundedWrite> {
        let mut state = self.state.lock().await;
        let Some(hash) = state.hashes.get_mut(key) else {
            return Ok(BoundedWrite::Missing);
        };
        let mut merged = hash.clone();
        merged.extend(fields);
        if counter(&merged, field) > counter(&merged, cap_field) {
            return Ok(BoundedWrite::Rejected);
        }
        *hash = merged;
        Ok(BoundedWrite::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn take_stops_at_zero() {
        let store = MemoryStore::new();
        store
            .hset("equipment:1", fields(&[("stock", "1"), ("available", "1")]))
            .await
            .unwrap();

        assert_eq!(
            store.htake_unit("equipment:1", "available").await.unwrap(),
            CounterOutcome::Changed { from: 1, to: 0 }
        );
        assert_eq!(
            store.htake_unit("equipment:1", "available").await.unwrap(),
            CounterOutcome::Exhausted
        );
        assert_eq!(
            store.htake_unit("equipment:2", "available").await.unwrap(),
            CounterOutcome::Missing
        );
    }

    #[tokio::test]
    async fn restore_is_capped_by_stock() {
        let store = MemoryStore::new();
        store
            .hset("equipment:1", fields(&[("stock", "2"), ("available", "1")]))
            .await
            .unwrap();

        assert_eq!(
            store
                .hrestore_unit("equipment:1", "available", "stock")
                .await
                .unwrap(),
            CounterOutcome::Changed { from: 1, to: 2 }
        );
        assert_eq!(
            store
                .hrestore_unit("equipment:1", "available", "stock")
                .await
                .unwrap(),
            CounterOutcome::Changed { from: 2, to: 2 }
        );
    }

    #[tokio::test]
    async fn compare_and_set_only_swaps_matching_value() {
        let store = MemoryStore::new();
        store
            .hset("renter:1", fields(&[("status", "\"Active\"")]))
            .await
            .unwrap();

        assert!(store
            .hcompare_and_set("renter:1", "status", "\"Active\"", "\"Completed\"")
            .await
            .unwrap());
        assert!(!store
            .hcompare_and_set("renter:1", "status", "\"Active\"", "\"Completed\"")
            .await
            .unwrap());
        assert!(!store
            .hcompare_and_set("renter:2", "status", "\"Active\"", "\"Completed\"")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn bounded_write_checks_the_merged_record() {
        let store = MemoryStore::new();
        store
            .hset("equipment:1", fields(&[("stock", "5"), ("available", "5")]))
            .await
            .unwrap();

        // available moved after the caller last looked; lowering stock must fail
        assert_eq!(
            store
                .hset_bounded("equipment:1", fields(&[("stock", "4")]), "available", "stock")
                .await
                .unwrap(),
            BoundedWrite::Rejected
        );
        assert_eq!(store.hgetall("equipment:1").await.unwrap()["stock"], "5");

        assert_eq!(
            store
                .hset_bounded(
                    "equipment:1",
                    fields(&[("stock", "4"), ("available", "4")]),
                    "available",
                    "stock"
                )
                .await
                .unwrap(),
            BoundedWrite::Written
        );
        assert_eq!(store.hgetall("equipment:1").await.unwrap()["stock"], "4");
        assert_eq!(
            store
                .hset_bounded("equipment:9", fields(&[("stock", "1")]), "available", "stock")
                .await
                .unwrap(),
            BoundedWrite::Missing
        );
    }

    #[tokio::test]
    async fn sets_track_membership() {
        let store = MemoryStore::new();
        store.sadd("renters", "a").await.unwrap();
        store.sadd("renters", "b").await.unwrap();
        store.sadd("renters", "a").await.unwrap();
        store.srem("renters", "b").await.unwrap();
        assert_eq!(store.smembers("renters").await.unwrap(), vec!["a".to_string()]);
    }
}
