//! Customer booking endpoint

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::renter::{CreateBooking, Renter},
    AppState,
};

/// Book equipment for a rental period
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created", body = Renter),
        (status = 400, description = "Invalid dates or equipment not available", body = crate::error::ErrorResponse),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(booking): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<Renter>)> {
    let renter = state.services.rentals.create_booking(booking).await?;
    Ok((StatusCode::CREATED, Json(renter)))
}
