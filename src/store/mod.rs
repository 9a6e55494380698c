//! Seat inventory storage.
//!
//! The engine talks to the inventory through `SeatStore`; the commit
//! operations carry the atomicity contract, so every implementation must make
//! `commit_reservation` all-or-nothing and `release_owned` per-seat atomic.

pub mod memory;
pub mod postgres;

pub use memory::InMemorySeatStore;
pub use postgres::PgSeatStore;

use async_trait::async_trait;

use crate::errors::BookingError;
use crate::models::Seat;

#[async_trait]
pub trait SeatStore: Send + Sync {
    /// Every seat, ordered by seat number ascending.
    async fn list_all(&self) -> Result<Vec<Seat>, BookingError>;

    /// Unbooked seats, ordered by seat number ascending.
    async fn list_available(&self) -> Result<Vec<Seat>, BookingError>;

    /// Claim the exact seat set for `user_id`. All-or-nothing: if any listed
    /// seat is already booked, no seat changes and `Conflict` is returned.
    /// On success returns the seats as now booked.
    async fn commit_reservation(
        &self,
        user_id: i64,
        seat_numbers: &[i32],
    ) -> Result<Vec<Seat>, BookingError>;

    /// Release each listed seat iff it is currently booked by `user_id`.
    /// Seats that do not match are skipped without error. Returns the seat
    /// numbers actually released.
    async fn release_owned(
        &self,
        user_id: i64,
        seat_numbers: &[i32],
    ) -> Result<Vec<i32>, BookingError>;

    /// Unconditionally release every seat. Returns how many were booked.
    async fn clear_all(&self) -> Result<u64, BookingError>;
}
