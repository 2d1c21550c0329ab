//! MountainGear rental server
//!
//! REST JSON backend for a mountain-equipment rental storefront: equipment
//! catalog and inventory, renter bookings and returns, a profit ledger and
//! storefront settings, persisted in a Redis-style key-value store.

use std::sync::Arc;
use std::time::Duration;

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use crate::{cache::ResponseCache, repository::Repository, services::Services, store::KvStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Wire repositories, cache and services on top of a store
    pub fn new(config: AppConfig, store: Arc<dyn KvStore>) -> Self {
        let cache = ResponseCache::new(Duration::from_secs(config.cache.ttl_seconds));
        let services = Services::new(Repository::new(store), cache, config.upload.clone());
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
