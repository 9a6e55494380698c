use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::BookingError;
use crate::models::Seat;
use crate::store::SeatStore;

/// Inventory backed by an in-process map, used by the engine test-suite.
/// The whole map sits behind one mutex, so each store call is a critical
/// section and the commit is trivially all-or-nothing.
#[derive(Clone)]
pub struct InMemorySeatStore {
    seats: Arc<Mutex<BTreeMap<i32, Option<i64>>>>,
}

impl InMemorySeatStore {
    pub fn with_capacity(total_seats: i32) -> Self {
        let seats = (1..=total_seats).map(|n| (n, None)).collect();
        Self {
            seats: Arc::new(Mutex::new(seats)),
        }
    }

    fn to_seat(number: i32, owner: Option<i64>) -> Seat {
        Seat {
            seat_number: number,
            is_booked: owner.is_some(),
            booked_by: owner,
        }
    }
}

#[async_trait]
impl SeatStore for InMemorySeatStore {
    async fn list_all(&self) -> Result<Vec<Seat>, BookingError> {
        let seats = self.seats.lock().await;
        Ok(seats
            .iter()
            .map(|(&n, &owner)| Self::to_seat(n, owner))
            .collect())
    }

    async fn list_available(&self) -> Result<Vec<Seat>, BookingError> {
        let seats = self.seats.lock().await;
        Ok(seats
            .iter()
            .filter(|(_, owner)| owner.is_none())
            .map(|(&n, &owner)| Self::to_seat(n, owner))
            .collect())
    }

    async fn commit_reservation(
        &self,
        user_id: i64,
        seat_numbers: &[i32],
    ) -> Result<Vec<Seat>, BookingError> {
        let mut seats = self.seats.lock().await;

        // Сначала проверяем весь набор, потом пишем - никаких частичных броней.
        for n in seat_numbers {
            match seats.get(n) {
                Some(None) => {}
                _ => return Err(BookingError::Conflict),
            }
        }

        let mut booked = Vec::with_capacity(seat_numbers.len());
        for &n in seat_numbers {
            seats.insert(n, Some(user_id));
            booked.push(Self::to_seat(n, Some(user_id)));
        }
        booked.sort_unstable_by_key(|s| s.seat_number);
        Ok(booked)
    }

    async fn release_owned(
        &self,
        user_id: i64,
        seat_numbers: &[i32],
    ) -> Result<Vec<i32>, BookingError> {
        let mut seats = self.seats.lock().await;

        let mut released = Vec::new();
        for &n in seat_numbers {
            if let Some(owner) = seats.get_mut(&n) {
                if *owner == Some(user_id) {
                    *owner = None;
                    released.push(n);
                }
            }
        }
        released.sort_unstable();
        Ok(released)
    }

    async fn clear_all(&self) -> Result<u64, BookingError> {
        let mut seats = self.seats.lock().await;
        let mut cleared = 0;
        for owner in seats.values_mut() {
            if owner.take().is_some() {
                cleared += 1;
            }
        }
        Ok(cleared)
    }
}
