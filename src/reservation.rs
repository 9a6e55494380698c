//! Reservation engine: the state transitions over the seat inventory.
//!
//! `reserve` is read-then-commit: availability is snapshotted, the allocation
//! policy picks a candidate set, and the store applies it as one conditional
//! atomic step. A concurrent booking of any candidate seat fails the whole
//! commit with `Conflict`; the caller retries against fresh state.

use tracing::{debug, info};

use crate::allocation;
use crate::config::SeatingConfig;
use crate::errors::BookingError;
use crate::models::Seat;
use crate::store::SeatStore;

#[derive(Clone)]
pub struct ReservationEngine<S> {
    store: S,
    seating: SeatingConfig,
}

impl<S: SeatStore> ReservationEngine<S> {
    pub fn new(store: S, seating: SeatingConfig) -> Self {
        Self { store, seating }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Book `seat_count` seats for `user_id`. All-or-nothing: on success the
    /// returned seats are owned by the user, on any failure nothing changed.
    pub async fn reserve(
        &self,
        user_id: i64,
        seat_count: u32,
    ) -> Result<Vec<Seat>, BookingError> {
        if seat_count < 1 || seat_count > self.seating.row_size {
            return Err(BookingError::InvalidSeatCount(self.seating.row_size));
        }

        let available = self.store.list_available().await?;
        let candidate =
            allocation::choose_seats(&available, seat_count as usize, self.seating.row_size)?;

        debug!(user_id, ?candidate, "attempting reservation commit");
        let booked = self.store.commit_reservation(user_id, &candidate).await?;

        info!(user_id, seats = ?candidate, "seats reserved");
        Ok(booked)
    }

    /// Release the listed seats where the caller is the owner. Mismatching
    /// seat numbers are skipped silently; the returned set tells the caller
    /// what actually changed. Idempotent.
    pub async fn cancel(
        &self,
        user_id: i64,
        seat_numbers: &[i32],
    ) -> Result<Vec<i32>, BookingError> {
        let released = self.store.release_owned(user_id, seat_numbers).await?;
        if !released.is_empty() {
            info!(user_id, seats = ?released, "seats released");
        }
        Ok(released)
    }

    /// Administrative: release every seat regardless of owner.
    pub async fn reset(&self) -> Result<u64, BookingError> {
        self.store.clear_all().await
    }
}
