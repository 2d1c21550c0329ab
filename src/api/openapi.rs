//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, bookings, equipment, health, profit, renters, settings, upload};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MountainGear API",
        version = "1.0.0",
        description = "Mountain equipment rental storefront REST API"
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Renters
        renters::list_renters,
        renters::get_renter,
        renters::create_renter,
        renters::update_renter,
        renters::delete_renter,
        renters::return_equipment,
        // Bookings
        bookings::create_booking,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Profit
        profit::get_total,
        profit::list_entries,
        // Settings
        settings::get_settings,
        settings::update_settings,
        // Upload
        upload::upload_image,
        // Admin
        admin::seed_catalog,
        admin::invalidate_cache,
    ),
    components(
        schemas(
            // Renters
            crate::models::renter::Renter,
            crate::models::renter::RenterStatus,
            crate::models::renter::RentedItem,
            crate::models::renter::CreateRenter,
            crate::models::renter::UpdateRenter,
            crate::models::renter::CreateBooking,
            renters::ReturnResponse,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::Condition,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            // Profit
            crate::models::profit::ProfitEntry,
            crate::models::profit::ProfitSummary,
            // Settings
            crate::models::settings::Settings,
            crate::models::settings::UpdateSettings,
            crate::models::settings::OperatingHours,
            crate::models::settings::SocialMedia,
            crate::models::settings::GuideImages,
            // Upload
            upload::UploadForm,
            crate::services::upload::UploadedImage,
            // Admin
            admin::SeedResponse,
            admin::InvalidateCacheRequest,
            admin::InvalidateCacheResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "renters", description = "Renter administration and returns"),
        (name = "bookings", description = "Customer bookings"),
        (name = "equipment", description = "Equipment catalog and inventory"),
        (name = "profit", description = "Profit ledger"),
        (name = "settings", description = "Storefront settings"),
        (name = "upload", description = "Image upload"),
        (name = "admin", description = "Sample data and cache control")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
