use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::turf::Turf;

/// Half-open interval overlap: `[a_start, a_end)` vs `[b_start, b_end)`.
pub fn overlaps(a_start: i32, a_end: i32, b_start: i32, b_end: i32) -> bool {
    !(a_end <= b_start || a_start >= b_end)
}

/// Field-level validation for a slot request. Capacity is checked here but
/// never enters the conflict test; one confirmed booking owns the whole turf
/// for its interval.
pub fn validate_slot(
    turf: &Turf,
    date: NaiveDate,
    start_hour: i32,
    end_hour: i32,
    players: i32,
) -> AppResult<()> {
    validate_slot_at(Utc::now().date_naive(), turf, date, start_hour, end_hour, players)
}

pub fn validate_slot_at(
    today: NaiveDate,
    turf: &Turf,
    date: NaiveDate,
    start_hour: i32,
    end_hour: i32,
    players: i32,
) -> AppResult<()> {
    if !turf.is_active {
        return Err(AppError::BadRequest(
            "This turf is currently unavailable.".into(),
        ));
    }
    if date < today {
        return Err(AppError::BadRequest("Please select a future date.".into()));
    }
    if !(0..=23).contains(&start_hour) || !(1..=24).contains(&end_hour) {
        return Err(AppError::BadRequest("Invalid time.".into()));
    }
    if end_hour <= start_hour {
        return Err(AppError::BadRequest(
            "End time must be after start time.".into(),
        ));
    }
    if players < 1 || players > turf.max_players {
        return Err(AppError::BadRequest(format!(
            "Players must be between 1 and {}.",
            turf.max_players
        )));
    }
    Ok(())
}

/// First confirmed booking on `(turf, date)` overlapping `[start, end)`,
/// if any. Any hit rejects the whole request, so ordering is irrelevant.
pub async fn find_conflict(
    db: &sqlx::PgPool,
    turf_id: Uuid,
    date: NaiveDate,
    start_hour: i32,
    end_hour: i32,
) -> AppResult<Option<Uuid>> {
    let rows: Vec<(Uuid, i32, i32)> = sqlx::query_as(
        r#"SELECT id, start_hour, end_hour FROM bookings
        WHERE turf_id = $1 AND booking_date = $2 AND status = 'confirmed'"#,
    )
    .bind(turf_id)
    .bind(date)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .find(|&(_, s, e)| overlaps(start_hour, end_hour, s, e))
        .map(|(id, _, _)| id))
}

/// Confirmed `[start, end)` intervals for a turf on a date, ordered by start.
/// This is the projection the public slots API exposes.
pub async fn booked_intervals(
    db: &sqlx::PgPool,
    turf_id: Uuid,
    date: NaiveDate,
) -> AppResult<Vec<(i32, i32)>> {
    let rows: Vec<(i32, i32)> = sqlx::query_as(
        r#"SELECT start_hour, end_hour FROM bookings
        WHERE turf_id = $1 AND booking_date = $2 AND status = 'confirmed'
        ORDER BY start_hour"#,
    )
    .bind(turf_id)
    .bind(date)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turf(max_players: i32, is_active: bool) -> Turf {
        Turf {
            id: Uuid::new_v4(),
            name: "Green Arena Football Turf".into(),
            location: "Koramangala".into(),
            city: "Bangalore".into(),
            distance: 1.2,
            rating: 4.8,
            review_count: 245,
            open_hour: 6,
            close_hour: 23,
            max_players,
            price_per_hour: 1200,
            sports: "Football,Cricket".into(),
            amenities: "Parking,Floodlight".into(),
            description: String::new(),
            is_active,
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn adjacent_intervals_do_not_overlap() {
        assert!(!overlaps(9, 11, 11, 13));
        assert!(!overlaps(11, 13, 9, 11));
    }

    #[test]
    fn partial_overlap_is_detected() {
        assert!(overlaps(9, 11, 10, 12));
        assert!(overlaps(10, 12, 9, 11));
    }

    #[test]
    fn identical_slot_conflicts_with_itself() {
        assert!(overlaps(9, 10, 9, 10));
    }

    #[test]
    fn containment_is_detected() {
        assert!(overlaps(9, 13, 10, 11));
        assert!(overlaps(10, 11, 9, 13));
    }

    #[test]
    fn valid_slot_passes() {
        let t = turf(22, true);
        assert!(validate_slot_at(date("2026-08-24"), &t, date("2026-08-25"), 9, 11, 10).is_ok());
    }

    #[test]
    fn same_day_slot_passes() {
        let t = turf(22, true);
        assert!(validate_slot_at(date("2026-08-24"), &t, date("2026-08-24"), 9, 10, 1).is_ok());
    }

    #[test]
    fn past_date_is_a_validation_error() {
        let t = turf(22, true);
        let err = validate_slot_at(date("2026-08-24"), &t, date("2026-08-23"), 9, 11, 10);
        assert!(matches!(err, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn inverted_or_empty_interval_is_a_validation_error() {
        let t = turf(22, true);
        assert!(validate_slot_at(date("2026-08-24"), &t, date("2026-08-25"), 11, 11, 5).is_err());
        assert!(validate_slot_at(date("2026-08-24"), &t, date("2026-08-25"), 11, 9, 5).is_err());
    }

    #[test]
    fn player_count_is_bounded_by_capacity() {
        let t = turf(8, true);
        assert!(validate_slot_at(date("2026-08-24"), &t, date("2026-08-25"), 9, 10, 0).is_err());
        assert!(validate_slot_at(date("2026-08-24"), &t, date("2026-08-25"), 9, 10, 9).is_err());
        assert!(validate_slot_at(date("2026-08-24"), &t, date("2026-08-25"), 9, 10, 8).is_ok());
    }

    #[test]
    fn inactive_turf_is_rejected() {
        let t = turf(22, false);
        let err = validate_slot_at(date("2026-08-24"), &t, date("2026-08-25"), 9, 11, 10);
        assert!(matches!(err, Err(AppError::BadRequest(_))));
    }
}
