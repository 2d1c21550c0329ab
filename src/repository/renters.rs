//! Renters repository (booking store)

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::renter::{Renter, RenterStatus},
    store::{decode_fields, decode_value, encode_fields, encode_value, KvStore},
};

use super::keys;

#[derive(Clone)]
pub struct RentersRepository {
    store: Arc<dyn KvStore>,
}

impl RentersRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// List all renters, newest first
    pub async fn list(&self) -> AppResult<Vec<Renter>> {
        let ids = self.store.smembers(keys::RENTERS).await?;
        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(renter) = self.find(&id).await? {
                rows.push(renter);
            }
        }
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    pub async fn find(&self, id: &str) -> AppResult<Option<Renter>> {
        let fields = self.store.hgetall(&keys::renter(id)).await?;
        if fields.is_empty() {
            return Ok(None);
        }
        Ok(Some(decode_fields(fields)?))
    }

    /// Get renter by ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<Renter> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Renter {} not found", id)))
    }

    pub async fn insert(&self, renter: &Renter) -> AppResult<()> {
        self.store
            .hset(&keys::renter(&renter.id), encode_fields(renter)?)
            .await?;
        self.store.sadd(keys::RENTERS, &renter.id).await
    }

    /// Overwrite the given fields of an existing record
    pub async fn update_fields(&self, id: &str, fields: Vec<(String, String)>) -> AppResult<Renter> {
        let key = keys::renter(id);
        if !self.store.exists(&key).await? {
            return Err(AppError::NotFound(format!("Renter {} not found", id)));
        }
        self.store.hset(&key, fields).await?;
        self.get_by_id(id).await
    }

    /// Atomically move the status from `from` to `to`.
    ///
    /// The swap compares against the raw stored value, so records written
    /// with legacy spellings (`Aktif`) transition like canonical ones.
    /// Returns false when the stored status is not `from` (or the renter is
    /// gone), in which case nothing was written.
    pub async fn transition_status(
        &self,
        id: &str,
        from: RenterStatus,
        to: RenterStatus,
    ) -> AppResult<bool> {
        let key = keys::renter(id);
        let fields = self.store.hgetall(&key).await?;
        let Some(raw) = fields.get("status") else {
            return Ok(false);
        };
        match decode_value::<RenterStatus>(raw) {
            Ok(current) if current == from => {}
            _ => return Ok(false),
        }
        self.store
            .hcompare_and_set(&key, "status", raw, &encode_value(&to)?)
            .await
    }

    /// Delete renter
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let existed = self.store.del(&keys::renter(id)).await?;
        self.store.srem(keys::RENTERS, id).await?;
        if !existed {
            return Err(AppError::NotFound(format!("Renter {} not found", id)));
        }
        Ok(())
    }
}
