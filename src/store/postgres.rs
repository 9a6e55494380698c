use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info};

use crate::errors::BookingError;
use crate::models::Seat;
use crate::store::SeatStore;

#[derive(Clone)]
pub struct PgSeatStore {
    pool: PgPool,
}

impl PgSeatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One-time seat provisioning: insert seats 1..=total if missing.
    /// Idempotent, safe to run on every startup.
    pub async fn provision(&self, total_seats: i32) -> Result<(), BookingError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO seats (seat_number)
            SELECT n FROM generate_series(1, $1) AS n
            ON CONFLICT (seat_number) DO NOTHING
            "#,
        )
        .bind(total_seats)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            info!("Seats initialized ({} created)", inserted);
        }
        Ok(())
    }

    async fn rollback_quietly(tx: Transaction<'_, Postgres>) {
        if let Err(e) = tx.rollback().await {
            tracing::warn!("failed to roll back reservation tx: {:?}", e);
        }
    }
}

#[async_trait]
impl SeatStore for PgSeatStore {
    async fn list_all(&self) -> Result<Vec<Seat>, BookingError> {
        let seats = sqlx::query_as::<_, Seat>(
            "SELECT seat_number, is_booked, booked_by FROM seats ORDER BY seat_number",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(seats)
    }

    async fn list_available(&self) -> Result<Vec<Seat>, BookingError> {
        let seats = sqlx::query_as::<_, Seat>(
            "SELECT seat_number, is_booked, booked_by FROM seats
             WHERE is_booked = FALSE ORDER BY seat_number",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(seats)
    }

    async fn commit_reservation(
        &self,
        user_id: i64,
        seat_numbers: &[i32],
    ) -> Result<Vec<Seat>, BookingError> {
        // Условный UPDATE внутри транзакции: помечаем только еще свободные
        // места. Если совпало меньше, чем запрошено, кто-то успел раньше -
        // откатываем все и возвращаем Conflict.
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query_as::<_, Seat>(
            r#"
            UPDATE seats
            SET is_booked = TRUE, booked_by = $1
            WHERE seat_number = ANY($2) AND is_booked = FALSE
            RETURNING seat_number, is_booked, booked_by
            "#,
        )
        .bind(user_id)
        .bind(seat_numbers)
        .fetch_all(&mut *tx)
        .await?;

        if claimed.len() != seat_numbers.len() {
            debug!(
                user_id,
                requested = seat_numbers.len(),
                claimed = claimed.len(),
                "reservation lost a race, rolling back"
            );
            Self::rollback_quietly(tx).await;
            return Err(BookingError::Conflict);
        }

        tx.commit().await?;

        let mut seats = claimed;
        seats.sort_unstable_by_key(|s| s.seat_number);
        Ok(seats)
    }

    async fn release_owned(
        &self,
        user_id: i64,
        seat_numbers: &[i32],
    ) -> Result<Vec<i32>, BookingError> {
        // Каждое место освобождается атомарно и только своим владельцем;
        // чужие и свободные места просто не совпадут с условием.
        let mut released = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE seats
            SET is_booked = FALSE, booked_by = NULL
            WHERE seat_number = ANY($1) AND is_booked = TRUE AND booked_by = $2
            RETURNING seat_number
            "#,
        )
        .bind(seat_numbers)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        released.sort_unstable();
        Ok(released)
    }

    async fn clear_all(&self) -> Result<u64, BookingError> {
        let cleared = sqlx::query(
            "UPDATE seats SET is_booked = FALSE, booked_by = NULL WHERE is_booked = TRUE",
        )
        .execute(&self.pool)
        .await?
        .rows_affected();

        info!("Reset released {} seats", cleared);
        Ok(cleared)
    }
}
