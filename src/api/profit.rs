//! Profit endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::profit::{ProfitEntry, ProfitSummary},
    AppState,
};

/// Total profit
#[utoipa::path(
    get,
    path = "/profit",
    tag = "profit",
    responses(
        (status = 200, description = "Sum of all ledger entries", body = ProfitSummary)
    )
)]
pub async fn get_total(State(state): State<AppState>) -> AppResult<Json<ProfitSummary>> {
    let summary = state.services.profit.total().await?;
    Ok(Json(summary))
}

/// Ledger entries, newest first
#[utoipa::path(
    get,
    path = "/profit/entries",
    tag = "profit",
    responses(
        (status = 200, description = "Profit entries", body = Vec<ProfitEntry>)
    )
)]
pub async fn list_entries(State(state): State<AppState>) -> AppResult<Json<Vec<ProfitEntry>>> {
    let entries = state.services.profit.entries().await?;
    Ok(Json(entries))
}
