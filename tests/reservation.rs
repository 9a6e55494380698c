//! Engine-level tests over the in-memory seat store.

use train_booking::config::SeatingConfig;
use train_booking::errors::BookingError;
use train_booking::reservation::ReservationEngine;
use train_booking::store::{InMemorySeatStore, SeatStore};

const ALICE: i64 = 1;
const BOB: i64 = 2;

fn engine(total_seats: i32) -> ReservationEngine<InMemorySeatStore> {
    ReservationEngine::new(
        InMemorySeatStore::with_capacity(total_seats),
        SeatingConfig {
            total_seats,
            row_size: 7,
        },
    )
}

#[tokio::test]
async fn reserves_lowest_seats_of_the_first_free_row() {
    let engine = engine(80);

    let booked = engine.reserve(ALICE, 3).await.unwrap();
    let numbers: Vec<i32> = booked.iter().map(|s| s.seat_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(booked.iter().all(|s| s.booked_by == Some(ALICE)));

    // Row 0 has 4 seats left, a party of 5 spills into row 1.
    let booked = engine.reserve(BOB, 5).await.unwrap();
    let numbers: Vec<i32> = booked.iter().map(|s| s.seat_number).collect();
    assert_eq!(numbers, vec![4, 5, 6, 7, 8]);
}

#[tokio::test]
async fn seat_count_outside_row_size_is_rejected() {
    let engine = engine(80);
    assert!(matches!(
        engine.reserve(ALICE, 0).await,
        Err(BookingError::InvalidSeatCount(7))
    ));
    assert!(matches!(
        engine.reserve(ALICE, 8).await,
        Err(BookingError::InvalidSeatCount(7))
    ));
}

#[tokio::test]
async fn insufficient_capacity_leaves_nothing_mutated() {
    let engine = engine(2);

    let err = engine.reserve(ALICE, 3).await.unwrap_err();
    assert!(matches!(err, BookingError::InsufficientCapacity));

    let available = engine.store().list_available().await.unwrap();
    assert_eq!(available.len(), 2);
}

#[tokio::test]
async fn no_seat_is_ever_double_booked() {
    let engine = engine(10);

    let mut owners = std::collections::HashMap::new();
    for user in 1..=5i64 {
        for seat in engine.reserve(user, 2).await.unwrap() {
            assert!(owners.insert(seat.seat_number, user).is_none());
        }
    }
    assert_eq!(owners.len(), 10);

    assert!(matches!(
        engine.reserve(6, 1).await,
        Err(BookingError::InsufficientCapacity)
    ));
}

#[tokio::test]
async fn commit_of_a_stale_candidate_set_conflicts_without_partial_booking() {
    let store = InMemorySeatStore::with_capacity(10);

    // Both callers computed overlapping candidates from the same snapshot.
    store.commit_reservation(ALICE, &[1, 2, 3]).await.unwrap();
    let err = store.commit_reservation(BOB, &[3, 4, 5]).await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict));

    // The losing commit must not have touched seats 4 and 5.
    let available: Vec<i32> = store
        .list_available()
        .await
        .unwrap()
        .iter()
        .map(|s| s.seat_number)
        .collect();
    assert_eq!(available, vec![4, 5, 6, 7, 8, 9, 10]);
}

#[tokio::test]
async fn concurrent_requests_for_the_last_seat_produce_one_winner() {
    let engine = std::sync::Arc::new(engine(1));

    let a = tokio::spawn({
        let engine = engine.clone();
        async move { engine.reserve(ALICE, 1).await }
    });
    let b = tokio::spawn({
        let engine = engine.clone();
        async move { engine.reserve(BOB, 1).await }
    });

    let (a, b) = (a.await.unwrap(), b.await.unwrap());
    assert!(
        a.is_ok() ^ b.is_ok(),
        "exactly one caller must win the last seat: {a:?} / {b:?}"
    );
    // The loser saw either a commit conflict or an exhausted pool, depending
    // on whether it read before or after the winner's commit.
    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(
        loser,
        Err(BookingError::Conflict | BookingError::InsufficientCapacity)
    ));
}

#[tokio::test]
async fn cancel_releases_only_the_callers_seats() {
    let engine = engine(80);

    engine.reserve(ALICE, 3).await.unwrap(); // seats 1..=3
    engine.reserve(BOB, 2).await.unwrap(); // seats 4..=5

    // Bob lists seats he does not own, plus a free and an unknown seat.
    let released = engine.cancel(BOB, &[1, 2, 4, 70, 999]).await.unwrap();
    assert_eq!(released, vec![4]);

    let available = engine.store().list_available().await.unwrap();
    assert!(available.iter().any(|s| s.seat_number == 4));
    assert!(!available.iter().any(|s| s.seat_number == 1));
}

#[tokio::test]
async fn cancel_is_idempotent() {
    let engine = engine(80);

    engine.reserve(ALICE, 2).await.unwrap();
    assert_eq!(engine.cancel(ALICE, &[1, 2]).await.unwrap(), vec![1, 2]);
    // Second call matches nothing and releases nothing.
    assert!(engine.cancel(ALICE, &[1, 2]).await.unwrap().is_empty());
}

#[tokio::test]
async fn reset_restores_the_full_universe() {
    let engine = engine(80);

    engine.reserve(ALICE, 7).await.unwrap();
    engine.reserve(BOB, 4).await.unwrap();

    assert_eq!(engine.reset().await.unwrap(), 11);
    let available = engine.store().list_available().await.unwrap();
    assert_eq!(available.len(), 80);
    assert!(available.iter().all(|s| s.booked_by.is_none()));
}
