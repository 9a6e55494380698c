use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single allocable seat. The row is derived from the seat number, never
/// stored: `row = (seat_number - 1) / row_size`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub seat_number: i32,
    pub is_booked: bool,
    pub booked_by: Option<i64>,
}

impl Seat {
    pub fn row(&self, row_size: u32) -> i32 {
        (self.seat_number - 1) / row_size as i32
    }
}
