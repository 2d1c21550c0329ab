//! Business logic services

pub mod equipment;
pub mod profit;
pub mod rentals;
pub mod renters;
pub mod settings;
pub mod upload;

use crate::{cache::ResponseCache, config::UploadConfig, repository::Repository};

/// Cache keys and invalidation prefixes
pub(crate) mod cache_keys {
    pub const EQUIPMENT: &str = "equipment";
    pub const EQUIPMENT_LIST: &str = "equipment:list";
    pub const PROFIT: &str = "profit";
    pub const PROFIT_TOTAL: &str = "profit:total";
    pub const SETTINGS: &str = "settings";
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub equipment: equipment::EquipmentService,
    pub renters: renters::RentersService,
    pub rentals: rentals::RentalsService,
    pub profit: profit::ProfitService,
    pub settings: settings::SettingsService,
    pub upload: upload::UploadService,
    pub cache: ResponseCache,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository and cache
    pub fn new(repository: Repository, cache: ResponseCache, upload_config: UploadConfig) -> Self {
        Self {
            equipment: equipment::EquipmentService::new(repository.clone(), cache.clone()),
            renters: renters::RentersService::new(repository.clone()),
            rentals: rentals::RentalsService::new(repository.clone(), cache.clone()),
            profit: profit::ProfitService::new(repository.clone(), cache.clone()),
            settings: settings::SettingsService::new(repository.clone(), cache.clone()),
            upload: upload::UploadService::new(upload_config),
            cache,
            repository,
        }
    }
}
