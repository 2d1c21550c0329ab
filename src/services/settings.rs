//! Settings service

use chrono::Utc;
use validator::Validate;

use crate::{
    cache::ResponseCache,
    error::{AppError, AppResult},
    models::settings::{Settings, UpdateSettings},
    repository::Repository,
    store::{encode_fields, encode_value},
};

use super::cache_keys;

const SETTINGS_ID: &str = "main";

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
    cache: ResponseCache,
}

impl SettingsService {
    pub fn new(repository: Repository, cache: ResponseCache) -> Self {
        Self { repository, cache }
    }

    /// Get current settings, writing the defaults on first access
    pub async fn get_settings(&self) -> AppResult<Settings> {
        if let Some(cached) = self.cache.get(cache_keys::SETTINGS).await {
            return Ok(cached);
        }
        let settings = self.load_or_seed().await?;
        self.cache.insert(cache_keys::SETTINGS, &settings).await;
        Ok(settings)
    }

    async fn load_or_seed(&self) -> AppResult<Settings> {
        if let Some(settings) = self.repository.settings.get().await? {
            return Ok(settings);
        }
        let settings = Settings::defaults(SETTINGS_ID.to_string(), Utc::now());
        self.repository.settings.save(&settings).await?;
        tracing::info!("Default settings created");
        Ok(settings)
    }

    /// Merge the provided fields into the stored settings
    pub async fn update_settings(&self, request: UpdateSettings) -> AppResult<Settings> {
        request.validate()?;
        self.load_or_seed().await?;

        let mut fields = encode_fields(&request)?;
        fields.push(("updatedAt".to_string(), encode_value(&Utc::now())?));
        self.repository.settings.update_fields(fields).await?;
        self.cache.invalidate(Some(cache_keys::SETTINGS)).await;

        tracing::info!("Settings updated");
        self.repository
            .settings
            .get()
            .await?
            .ok_or_else(|| AppError::Internal("Settings vanished after update".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::SocialMedia;
    use crate::store::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn service() -> SettingsService {
        SettingsService::new(
            Repository::new(Arc::new(MemoryStore::new())),
            ResponseCache::new(Duration::from_secs(60)),
        )
    }

    #[tokio::test]
    async fn first_read_seeds_defaults() {
        let service = service();
        let settings = service.get_settings().await.unwrap();
        assert_eq!(settings.id, "main");
        assert_eq!(settings.store_name, "MountainGear");

        let again = service.get_settings().await.unwrap();
        assert_eq!(again, settings);
    }

    #[tokio::test]
    async fn update_preserves_untouched_fields() {
        let service = service();
        let before = service.get_settings().await.unwrap();

        let after = service
            .update_settings(UpdateSettings {
                store_name: Some("Summit Rentals".to_string()),
                social_media: Some(SocialMedia {
                    instagram: Some("@summit".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(after.store_name, "Summit Rentals");
        assert_eq!(after.social_media.instagram.as_deref(), Some("@summit"));
        assert_eq!(after.social_media.facebook, None);
        assert_eq!(after.address, before.address);
        assert_eq!(after.operating_hours, before.operating_hours);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);

        // the cached copy was dropped by the write
        assert_eq!(service.get_settings().await.unwrap().store_name, "Summit Rentals");
    }

    #[tokio::test]
    async fn update_without_prior_read_seeds_first() {
        let service = service();
        let settings = service
            .update_settings(UpdateSettings {
                phone: Some("+62 811".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(settings.phone, "+62 811");
        assert_eq!(settings.store_name, "MountainGear");
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let service = service();
        let err = service
            .update_settings(UpdateSettings {
                email: Some("not-an-email".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
