//! API handlers for MountainGear REST endpoints

pub mod admin;
pub mod bookings;
pub mod equipment;
pub mod health;
pub mod openapi;
pub mod profit;
pub mod renters;
pub mod settings;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = state.services.upload.max_bytes();

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Renters
        .route("/renters", get(renters::list_renters).post(renters::create_renter))
        .route(
            "/renters/:id",
            get(renters::get_renter)
                .put(renters::update_renter)
                .delete(renters::delete_renter),
        )
        .route("/renters/return/:id", post(renters::return_equipment))
        // Bookings
        .route("/bookings", post(bookings::create_booking))
        // Equipment
        .route(
            "/equipment",
            get(equipment::list_equipment).post(equipment::create_equipment),
        )
        .route(
            "/equipment/:id",
            get(equipment::get_equipment)
                .put(equipment::update_equipment)
                .delete(equipment::delete_equipment),
        )
        // Profit
        .route("/profit", get(profit::get_total))
        .route("/profit/entries", get(profit::list_entries))
        // Settings
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        // Upload (multipart body, own limit)
        .route(
            "/upload",
            post(upload::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Admin utilities
        .route("/seed", post(admin::seed_catalog))
        .route("/cache/invalidate", post(admin::invalidate_cache))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
