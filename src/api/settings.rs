//! Settings endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::settings::{Settings, UpdateSettings},
    AppState,
};

/// Get storefront settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    responses(
        (status = 200, description = "Current settings", body = Settings)
    )
)]
pub async fn get_settings(State(state): State<AppState>) -> AppResult<Json<Settings>> {
    let settings = state.services.settings.get_settings().await?;
    Ok(Json(settings))
}

/// Update storefront settings
#[utoipa::path(
    put,
    path = "/settings",
    tag = "settings",
    request_body = UpdateSettings,
    responses(
        (status = 200, description = "Settings updated", body = Settings),
        (status = 400, description = "Invalid settings", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettings>,
) -> AppResult<Json<Settings>> {
    let settings = state.services.settings.update_settings(request).await?;
    Ok(Json(settings))
}
