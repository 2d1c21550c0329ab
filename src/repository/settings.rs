//! Settings repository (single hash)

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::settings::Settings,
    store::{decode_fields, encode_fields, KvStore},
};

use super::keys;

#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn KvStore>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self) -> AppResult<Option<Settings>> {
        let fields = self.store.hgetall(keys::SETTINGS).await?;
        if fields.is_empty() {
            return Ok(None);
        }
        Ok(Some(decode_fields(fields)?))
    }

    pub async fn save(&self, settings: &Settings) -> AppResult<()> {
        self.store
            .hset(keys::SETTINGS, encode_fields(settings)?)
            .await
    }

    /// Overwrite only the given fields
    pub async fn update_fields(&self, fields: Vec<(String, String)>) -> AppResult<()> {
        self.store.hset(keys::SETTINGS, fields).await
    }
}
