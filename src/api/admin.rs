//! Maintenance endpoints: sample data and cache control

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppResult, AppState};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub success: bool,
    pub message: String,
    /// Number of equipment records created
    pub created: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InvalidateCacheRequest {
    /// Only drop keys starting with this prefix
    pub prefix: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct InvalidateCacheResponse {
    /// Number of dropped entries
    pub dropped: usize,
}

/// Add the sample equipment catalog
#[utoipa::path(
    post,
    path = "/seed",
    tag = "admin",
    responses(
        (status = 201, description = "Sample catalog created", body = SeedResponse)
    )
)]
pub async fn seed_catalog(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<SeedResponse>)> {
    let created = state.services.equipment.seed_catalog().await?;
    Ok((
        StatusCode::CREATED,
        Json(SeedResponse {
            success: true,
            message: "Sample equipment added".to_string(),
            created: created.len(),
        }),
    ))
}

/// Drop cached responses
#[utoipa::path(
    post,
    path = "/cache/invalidate",
    tag = "admin",
    request_body = InvalidateCacheRequest,
    responses(
        (status = 200, description = "Cache entries dropped", body = InvalidateCacheResponse)
    )
)]
pub async fn invalidate_cache(
    State(state): State<AppState>,
    request: Option<Json<InvalidateCacheRequest>>,
) -> Json<InvalidateCacheResponse> {
    let prefix = request.and_then(|Json(request)| request.prefix);
    let dropped = state.services.cache.invalidate(prefix.as_deref()).await;
    tracing::info!("Cache invalidated ({} entries)", dropped);
    Json(InvalidateCacheResponse { dropped })
}
