//! Repository layer over the key-value store

pub mod equipment;
pub mod profits;
pub mod renters;
pub mod settings;

use std::sync::Arc;

use crate::store::KvStore;

/// Key layout shared by all repositories
pub mod keys {
    pub const RENTERS: &str = "renters";
    pub const EQUIPMENT: &str = "equipment";
    pub const PROFITS: &str = "profits";
    pub const SETTINGS: &str = "settings:main";

    pub fn renter(id: &str) -> String {
        format!("renter:{}", id)
    }

    pub fn equipment(id: &str) -> String {
        format!("equipment:{}", id)
    }

    pub fn profit(id: &str) -> String {
        format!("profit:{}", id)
    }
}

/// Main repository struct holding the store handle
#[derive(Clone)]
pub struct Repository {
    pub store: Arc<dyn KvStore>,
    pub equipment: equipment::EquipmentRepository,
    pub renters: renters::RentersRepository,
    pub profits: profits::ProfitsRepository,
    pub settings: settings::SettingsRepository,
}

impl Repository {
    /// Create a new repository on top of the given store
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            equipment: equipment::EquipmentRepository::new(store.clone()),
            renters: renters::RentersRepository::new(store.clone()),
            profits: profits::ProfitsRepository::new(store.clone()),
            settings: settings::SettingsRepository::new(store.clone()),
            store,
        }
    }
}
