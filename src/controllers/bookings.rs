use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::errors::BookingError;
use crate::middleware::AuthUser;
use crate::models::Seat;
use crate::store::SeatStore;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seats", get(get_seats))
        .route("/reserve", post(reserve_seats))
        .route("/cancel", post(cancel_reservation))
        .route("/reset", post(reset_seats))
}

/* ---------- SEATS ---------- */

// GET /api/seats
async fn get_seats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Seat>>, BookingError> {
    let seats = state.engine.store().list_all().await?;
    Ok(Json(seats))
}

/* ---------- RESERVATION ---------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReserveRequest {
    seat_count: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReserveResponse {
    message: String,
    booked_seats: Vec<Seat>,
}

// POST /api/reserve
async fn reserve_seats(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<ReserveRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let booked = state.engine.reserve(user.user_id, req.seat_count).await?;

    Ok((
        StatusCode::OK,
        Json(ReserveResponse {
            message: "Seats reserved successfully".to_string(),
            booked_seats: booked,
        }),
    ))
}

/* ---------- CANCELLATION ---------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CancelRequest {
    seat_numbers: Vec<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelResponse {
    message: String,
    released_seats: Vec<i32>,
}

// POST /api/cancel
async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CancelRequest>,
) -> Result<impl IntoResponse, BookingError> {
    // Чужие и свободные места молча пропускаются; releasedSeats показывает,
    // что реально изменилось.
    let released = state.engine.cancel(user.user_id, &req.seat_numbers).await?;

    Ok((
        StatusCode::OK,
        Json(CancelResponse {
            message: "Reservation canceled successfully".to_string(),
            released_seats: released,
        }),
    ))
}

/* ---------- RESET ---------- */

// POST /api/reset - административный сброс всех броней
async fn reset_seats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, BookingError> {
    tracing::warn!("RESET: releasing every seat");
    let cleared = state.engine.reset().await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "All reservations have been reset",
            "seatsReleased": cleared,
        })),
    ))
}
