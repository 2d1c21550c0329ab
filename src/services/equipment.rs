//! Equipment service (catalog and inventory administration)

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    cache::ResponseCache,
    error::{AppError, AppResult},
    models::equipment::{Condition, CreateEquipment, Equipment, UpdateEquipment},
    repository::Repository,
    store::encode_fields,
};

use super::cache_keys;

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
    cache: ResponseCache,
}

fn check_counts(stock: u32, available: u32) -> AppResult<()> {
    if available > stock {
        return Err(AppError::Validation(format!(
            "available ({}) cannot exceed stock ({})",
            available, stock
        )));
    }
    Ok(())
}

impl EquipmentService {
    pub fn new(repository: Repository, cache: ResponseCache) -> Self {
        Self { repository, cache }
    }

    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        if let Some(cached) = self.cache.get(cache_keys::EQUIPMENT_LIST).await {
            return Ok(cached);
        }
        let equipment = self.repository.equipment.list().await?;
        self.cache.insert(cache_keys::EQUIPMENT_LIST, &equipment).await;
        Ok(equipment)
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        let available = data.available.unwrap_or(data.stock);
        check_counts(data.stock, available)?;

        let equipment = Equipment {
            id: Uuid::new_v4().to_string(),
            name: data.name.trim().to_string(),
            category: data.category.clone(),
            stock: data.stock,
            available,
            price: data.price,
            condition: data.condition.unwrap_or_default(),
            description: data.description.clone().unwrap_or_default(),
            image_url: data.image_url.clone(),
            created_at: Utc::now(),
        };
        self.repository.equipment.insert(&equipment).await?;
        self.cache.invalidate(Some(cache_keys::EQUIPMENT)).await;

        tracing::info!("Created equipment {} ({})", equipment.name, equipment.id);
        Ok(equipment)
    }

    /// Admin overwrite of any provided field; the merged record must keep
    /// `available <= stock`, checked by the store against the live counters.
    pub async fn update(&self, id: &str, data: &UpdateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        if let (Some(stock), Some(available)) = (data.stock, data.available) {
            check_counts(stock, available)?;
        }

        let equipment = self
            .repository
            .equipment
            .update_fields(id, encode_fields(data)?)
            .await?;
        self.cache.invalidate(Some(cache_keys::EQUIPMENT)).await;
        Ok(equipment)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.equipment.delete(id).await?;
        self.cache.invalidate(Some(cache_keys::EQUIPMENT)).await;
        Ok(())
    }

    /// Add the sample catalog
    pub async fn seed_catalog(&self) -> AppResult<Vec<Equipment>> {
        let mut created = Vec::new();
        for item in sample_catalog() {
            created.push(self.create(&item).await?);
        }
        tracing::info!("Seeded {} sample equipment records", created.len());
        Ok(created)
    }
}

fn sample(
    name: &str,
    category: &str,
    stock: u32,
    available: u32,
    price: u64,
    condition: Condition,
    description: &str,
) -> CreateEquipment {
    CreateEquipment {
        name: name.to_string(),
        category: category.to_string(),
        stock,
        available: Some(available),
        price,
        condition: Some(condition),
        description: Some(description.to_string()),
        image_url: None,
    }
}

fn sample_catalog() -> Vec<CreateEquipment> {
    use Condition::*;
    vec![
        sample("Dome Tent 2-3 Person", "Tent", 5, 5, 50_000, Good, "Wind and water resistant dome tent for two to three people"),
        sample("Carrier 60L", "Carrier", 8, 8, 40_000, Good, "60 litre pack with ventilated back panel, for two to three day climbs"),
        sample("Sleeping Bag -5°C", "Sleeping Bag", 10, 0, 25_000, Maintenance, "Light, compact sleeping bag rated to -5°C"),
        sample("Portable Gas Stove", "Stove", 12, 12, 20_000, Good, "Portable gas stove with piezo ignition"),
        sample("Foam Mat 10mm", "Mat", 15, 15, 15_000, Good, "10mm foam sleeping mat"),
        sample("Nesting Set 4 Pcs", "Cookware", 10, 10, 18_000, Good, "Four-piece non-stick cooking set"),
        sample("Carbon Trekking Pole", "Trekking Pole", 6, 6, 30_000, Good, "Adjustable ultralight carbon fibre trekking pole"),
        sample("Rain Suit Set", "Rainwear", 20, 20, 22_000, Good, "Waterproof, breathable jacket and trousers"),
        sample("LED Headlamp 300 Lumen", "Headlamp", 8, 0, 12_000, Maintenance, "Rechargeable 300 lumen LED headlamp"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn service() -> EquipmentService {
        let repository = Repository::new(Arc::new(MemoryStore::new()));
        EquipmentService::new(repository, ResponseCache::new(Duration::from_secs(60)))
    }

    fn tent(stock: u32, available: Option<u32>) -> CreateEquipment {
        CreateEquipment {
            name: "Dome Tent".to_string(),
            category: "Tent".to_string(),
            stock,
            available,
            price: 50_000,
            condition: None,
            description: None,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn available_defaults_to_stock() {
        let service = service();
        let created = service.create(&tent(5, None)).await.unwrap();
        assert_eq!(created.available, 5);
        assert_eq!(created.condition, Condition::Good);

        let fetched = service.get_by_id(&created.id).await.unwrap();
        assert_eq!(fetched.name, "Dome Tent");
        assert_eq!(fetched.stock, 5);
    }

    #[tokio::test]
    async fn available_above_stock_is_rejected() {
        let service = service();
        let err = service.create(&tent(2, Some(3))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let created = service.create(&tent(2, None)).await.unwrap();
        let update = UpdateEquipment {
            stock: Some(1),
            ..Default::default()
        };
        let err = service.update(&created.id, &update).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let update = UpdateEquipment {
            stock: Some(1),
            available: Some(1),
            ..Default::default()
        };
        let updated = service.update(&created.id, &update).await.unwrap();
        assert_eq!((updated.stock, updated.available), (1, 1));
        assert_eq!(updated.name, "Dome Tent");
    }

    #[tokio::test]
    async fn stock_cut_checks_live_availability() {
        let service = service();
        let created = service.create(&tent(5, Some(4))).await.unwrap();

        // a unit comes back between the admin's read and write
        service.repository.equipment.restore_unit(&created.id).await.unwrap();

        let update = UpdateEquipment {
            stock: Some(4),
            ..Default::default()
        };
        let err = service.update(&created.id, &update).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let stored = service.get_by_id(&created.id).await.unwrap();
        assert_eq!((stored.stock, stored.available), (5, 5));
    }

    #[tokio::test]
    async fn list_reflects_writes_despite_cache() {
        let service = service();
        assert!(service.list().await.unwrap().is_empty());

        let created = service.create(&tent(1, None)).await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 1);

        service.delete(&created.id).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());

        let err = service.delete(&created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn seeded_catalog_is_sorted_by_name() {
        let service = service();
        let seeded = service.seed_catalog().await.unwrap();
        assert_eq!(seeded.len(), 9);

        let listed = service.list().await.unwrap();
        let names: Vec<_> = listed.iter().map(|e| e.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(listed.iter().all(|e| e.available <= e.stock));
    }
}
