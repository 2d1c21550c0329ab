//! Profit ledger: append-only entries plus a membership set

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::profit::ProfitEntry,
    store::{decode_fields, encode_fields, KvStore},
};

use super::keys;

#[derive(Clone)]
pub struct ProfitsRepository {
    store: Arc<dyn KvStore>,
}

impl ProfitsRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Append a new entry crediting `amount` for `renter_id`
    pub async fn append(&self, renter_id: &str, amount: u64) -> AppResult<ProfitEntry> {
        let entry = ProfitEntry {
            id: Uuid::new_v4().to_string(),
            renter_id: renter_id.to_string(),
            amount,
            created_at: Utc::now(),
        };
        self.store
            .hset(&keys::profit(&entry.id), encode_fields(&entry)?)
            .await?;
        self.store.sadd(keys::PROFITS, &entry.id).await?;
        Ok(entry)
    }

    /// All entries, newest first
    pub async fn list(&self) -> AppResult<Vec<ProfitEntry>> {
        let ids = self.store.smembers(keys::PROFITS).await?;
        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            let fields = self.store.hgetall(&keys::profit(&id)).await?;
            if fields.is_empty() {
                continue;
            }
            rows.push(decode_fields::<ProfitEntry>(fields)?);
        }
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    /// Sum of all entry amounts
    pub async fn total(&self) -> AppResult<u64> {
        Ok(self.list().await?.iter().map(|entry| entry.amount).sum())
    }
}
