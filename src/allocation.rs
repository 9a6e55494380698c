//! Allocation policy: which seats satisfy a request.
//!
//! Pure function over an availability snapshot. Prefers to seat the whole
//! party in the lowest-numbered row that still has enough free seats at its
//! front; otherwise falls back to the lowest free seat numbers overall, so a
//! request never fails while the pool has enough total capacity.

use crate::errors::BookingError;
use crate::models::Seat;

/// Choose `seat_count` seats from `available`, which must be sorted by seat
/// number ascending (the inventory queries guarantee this).
///
/// Returns the chosen seat numbers, lowest first. No side effects; the caller
/// commits the set atomically and retries from a fresh snapshot on conflict.
pub fn choose_seats(
    available: &[Seat],
    seat_count: usize,
    row_size: u32,
) -> Result<Vec<i32>, BookingError> {
    if available.len() < seat_count {
        return Err(BookingError::InsufficientCapacity);
    }

    // Максимальный префикс мест из ряда первого свободного места.
    // Внутри ряда могут быть дыры - важен только сам ряд.
    let first_row = available[0].row(row_size);
    let same_row_len = available
        .iter()
        .take_while(|seat| seat.row(row_size) == first_row)
        .count();

    // Если ряд первого свободного места вмещает всю группу - сажаем в него,
    // иначе берем первые свободные места без оглядки на границы рядов.
    let candidates = if same_row_len >= seat_count {
        &available[..same_row_len]
    } else {
        available
    };

    Ok(candidates[..seat_count]
        .iter()
        .map(|s| s.seat_number)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    const ROW_SIZE: u32 = 7;

    fn free(numbers: &[i32]) -> Vec<Seat> {
        numbers
            .iter()
            .map(|&n| Seat {
                seat_number: n,
                is_booked: false,
                booked_by: None,
            })
            .collect()
    }

    #[test]
    fn full_first_row_keeps_party_together() {
        let available = free(&(1..=80).collect::<Vec<_>>());
        let chosen = choose_seats(&available, 3, ROW_SIZE).unwrap();
        assert_eq!(chosen, vec![1, 2, 3]);
    }

    #[test]
    fn falls_back_across_rows_when_first_row_too_small() {
        // После брони {1,2,3}: в ряду 0 остаются 4 места, запрос на 5
        // переливается в следующий ряд.
        let available = free(&(4..=80).collect::<Vec<_>>());
        let chosen = choose_seats(&available, 5, ROW_SIZE).unwrap();
        assert_eq!(chosen, vec![4, 5, 6, 7, 8]);
    }

    #[test]
    fn gaps_inside_the_row_still_count_as_same_row() {
        // Seats 2, 4, 6 free in row 0, plus row 1 untouched.
        let mut numbers = vec![2, 4, 6];
        numbers.extend(8..=14);
        let available = free(&numbers);
        let chosen = choose_seats(&available, 3, ROW_SIZE).unwrap();
        assert_eq!(chosen, vec![2, 4, 6]);
    }

    #[test]
    fn partial_row_smaller_than_request_spills_over() {
        let mut numbers = vec![6, 7];
        numbers.extend(8..=14);
        let available = free(&numbers);
        let chosen = choose_seats(&available, 3, ROW_SIZE).unwrap();
        assert_eq!(chosen, vec![6, 7, 8]);
    }

    #[test]
    fn insufficient_capacity_when_pool_too_small() {
        let available = free(&[12, 40]);
        let err = choose_seats(&available, 3, ROW_SIZE).unwrap_err();
        assert!(matches!(err, BookingError::InsufficientCapacity));
    }

    #[test]
    fn exact_remaining_capacity_is_granted() {
        let available = free(&[12, 40, 77]);
        let chosen = choose_seats(&available, 3, ROW_SIZE).unwrap();
        assert_eq!(chosen, vec![12, 40, 77]);
    }

    proptest! {
        // Любой запрос, который пул может покрыть, покрывается ровно
        // seat_count местами из доступных, по возрастанию номеров.
        #[test]
        fn satisfiable_requests_always_succeed(
            numbers in proptest::collection::btree_set(1..=80i32, 1..=80),
            count in 1..=7usize,
        ) {
            let available = free(&numbers.iter().copied().collect::<Vec<_>>());
            match choose_seats(&available, count, ROW_SIZE) {
                Ok(chosen) => {
                    prop_assert!(available.len() >= count);
                    prop_assert_eq!(chosen.len(), count);
                    let unique: BTreeSet<i32> = chosen.iter().copied().collect();
                    prop_assert_eq!(unique.len(), count);
                    for n in &chosen {
                        prop_assert!(numbers.contains(n));
                    }
                    let mut sorted = chosen.clone();
                    sorted.sort_unstable();
                    prop_assert_eq!(sorted, chosen);
                }
                Err(BookingError::InsufficientCapacity) => {
                    prop_assert!(available.len() < count);
                }
                Err(e) => return Err(TestCaseError::fail(format!("unexpected error: {e}"))),
            }
        }

        // Детерминизм: одинаковый вход дает одинаковый выбор.
        #[test]
        fn policy_is_deterministic(
            numbers in proptest::collection::btree_set(1..=80i32, 7..=80),
            count in 1..=7usize,
        ) {
            let available = free(&numbers.iter().copied().collect::<Vec<_>>());
            let a = choose_seats(&available, count, ROW_SIZE).unwrap();
            let b = choose_seats(&available, count, ROW_SIZE).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
