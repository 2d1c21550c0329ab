//! Equipment repository (inventory store)

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::equipment::Equipment,
    store::{decode_fields, encode_fields, BoundedWrite, CounterOutcome, KvStore},
};

use super::keys;

#[derive(Clone)]
pub struct EquipmentRepository {
    store: Arc<dyn KvStore>,
}

impl EquipmentRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// List all equipment, ordered by name
    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        let ids = self.store.smembers(keys::EQUIPMENT).await?;
        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            // Ids whose hash is gone are skipped
            if let Some(equipment) = self.find(&id).await? {
                rows.push(equipment);
            }
        }
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    pub async fn find(&self, id: &str) -> AppResult<Option<Equipment>> {
        let fields = self.store.hgetall(&keys::equipment(id)).await?;
        if fields.is_empty() {
            return Ok(None);
        }
        Ok(Some(decode_fields(fields)?))
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<Equipment> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// First equipment whose name matches exactly
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Equipment>> {
        Ok(self.list().await?.into_iter().find(|e| e.name == name))
    }

    pub async fn insert(&self, equipment: &Equipment) -> AppResult<()> {
        self.store
            .hset(&keys::equipment(&equipment.id), encode_fields(equipment)?)
            .await?;
        self.store.sadd(keys::EQUIPMENT, &equipment.id).await
    }

    /// Overwrite the given fields of an existing record. The write is
    /// refused when the stored record would end up with `available > stock`.
    pub async fn update_fields(&self, id: &str, fields: Vec<(String, String)>) -> AppResult<Equipment> {
        match self
            .store
            .hset_bounded(&keys::equipment(id), fields, "available", "stock")
            .await?
        {
            BoundedWrite::Written => self.get_by_id(id).await,
            BoundedWrite::Rejected => Err(AppError::Validation(
                "available cannot exceed stock".to_string(),
            )),
            BoundedWrite::Missing => Err(AppError::NotFound(format!("Equipment {} not found", id))),
        }
    }

    /// Delete equipment
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let existed = self.store.del(&keys::equipment(id)).await?;
        self.store.srem(keys::EQUIPMENT, id).await?;
        if !existed {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    /// Take one unit out of `available` unless none is left
    pub async fn take_unit(&self, id: &str) -> AppResult<CounterOutcome> {
        self.store.htake_unit(&keys::equipment(id), "available").await
    }

    /// Put one unit back into `available`, capped at `stock`
    pub async fn restore_unit(&self, id: &str) -> AppResult<CounterOutcome> {
        self.store
            .hrestore_unit(&keys::equipment(id), "available", "stock")
            .await
    }
}
