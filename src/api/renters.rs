//! Renter endpoints (admin CRUD and equipment return)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::renter::{CreateRenter, Renter, UpdateRenter},
    AppState,
};

/// Return response
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnResponse {
    pub success: bool,
    pub message: String,
    /// Amount credited to the profit ledger
    pub profit_added: u64,
}

/// List all renters, newest first
#[utoipa::path(
    get,
    path = "/renters",
    tag = "renters",
    responses(
        (status = 200, description = "Renter list", body = Vec<Renter>)
    )
)]
pub async fn list_renters(State(state): State<AppState>) -> AppResult<Json<Vec<Renter>>> {
    let renters = state.services.renters.list().await?;
    Ok(Json(renters))
}

/// Get renter by ID
#[utoipa::path(
    get,
    path = "/renters/{id}",
    tag = "renters",
    params(("id" = String, Path, description = "Renter ID")),
    responses(
        (status = 200, description = "Renter details", body = Renter),
        (status = 404, description = "Renter not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_renter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Renter>> {
    let renter = state.services.renters.get_by_id(&id).await?;
    Ok(Json(renter))
}

/// Record a renter by hand (inventory is not touched)
#[utoipa::path(
    post,
    path = "/renters",
    tag = "renters",
    request_body = CreateRenter,
    responses(
        (status = 201, description = "Renter created", body = Renter),
        (status = 400, description = "Invalid renter", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_renter(
    State(state): State<AppState>,
    Json(data): Json<CreateRenter>,
) -> AppResult<(StatusCode, Json<Renter>)> {
    let renter = state.services.renters.create(data).await?;
    Ok((StatusCode::CREATED, Json(renter)))
}

/// Update renter (admin override)
#[utoipa::path(
    put,
    path = "/renters/{id}",
    tag = "renters",
    params(("id" = String, Path, description = "Renter ID")),
    request_body = UpdateRenter,
    responses(
        (status = 200, description = "Renter updated", body = Renter),
        (status = 400, description = "Status change not allowed", body = crate::error::ErrorResponse),
        (status = 404, description = "Renter not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_renter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<UpdateRenter>,
) -> AppResult<Json<Renter>> {
    let renter = state.services.renters.update(&id, data).await?;
    Ok(Json(renter))
}

/// Delete renter
#[utoipa::path(
    delete,
    path = "/renters/{id}",
    tag = "renters",
    params(("id" = String, Path, description = "Renter ID")),
    responses(
        (status = 204, description = "Renter deleted"),
        (status = 404, description = "Renter not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_renter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.renters.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Return rented equipment
#[utoipa::path(
    post,
    path = "/renters/return/{id}",
    tag = "renters",
    params(("id" = String, Path, description = "Renter ID")),
    responses(
        (status = 200, description = "Equipment returned", body = ReturnResponse),
        (status = 400, description = "Rental is not active", body = crate::error::ErrorResponse),
        (status = 404, description = "Renter not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ReturnResponse>> {
    let outcome = state.services.rentals.return_equipment(&id).await?;

    let message = if outcome.unmatched_items.is_empty() {
        "Equipment returned successfully".to_string()
    } else {
        format!(
            "Equipment returned; not found in inventory: {}",
            outcome.unmatched_items.join(", ")
        )
    };

    Ok(Json(ReturnResponse {
        success: true,
        message,
        profit_added: outcome.profit.amount,
    }))
}
