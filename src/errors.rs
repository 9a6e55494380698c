use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure modes of the reservation engine.
///
/// `Conflict` is deliberately distinct from `InsufficientCapacity`: a conflict
/// means the caller lost a race on the commit and may retry immediately (the
/// allocation is recomputed from fresh state), while insufficient capacity
/// only clears up after someone cancels.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("You can reserve between 1 and {0} seats")]
    InvalidSeatCount(u32),

    #[error("Not enough seats available")]
    InsufficientCapacity,

    #[error("Seats were taken by a concurrent reservation, please retry")]
    Conflict,

    #[error("storage error: {0}")]
    Store(#[from] sqlx::Error),
}

impl BookingError {
    fn status(&self) -> StatusCode {
        match self {
            BookingError::InvalidSeatCount(_) => StatusCode::BAD_REQUEST,
            BookingError::InsufficientCapacity => StatusCode::BAD_REQUEST,
            BookingError::Conflict => StatusCode::CONFLICT,
            BookingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        if let BookingError::Store(ref e) = self {
            tracing::error!("seat store error: {:?}", e);
        }
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
