use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::booking::PendingBooking;

const SLOT_TAKEN_MSG: &str = "Sorry, this slot was just booked. Please select another time.";

/// Commits a staged booking. The conflict re-check and the insert run inside
/// one SERIALIZABLE transaction so that two sessions racing on the same open
/// slot cannot both pass the check: the loser either sees the winner's row or
/// fails to serialize, and both cases surface as `SlotTaken`.
pub async fn commit_pending(
    db: &sqlx::PgPool,
    user_id: Uuid,
    pending: &PendingBooking,
) -> AppResult<Uuid> {
    let mut tx = db.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await?;

    let conflict: Option<Uuid> = sqlx::query_scalar(
        r#"SELECT id FROM bookings
        WHERE turf_id = $1 AND booking_date = $2 AND status = 'confirmed'
        AND NOT (end_hour <= $3 OR start_hour >= $4)
        LIMIT 1"#,
    )
    .bind(pending.turf_id)
    .bind(pending.booking_date)
    .bind(pending.start_hour)
    .bind(pending.end_hour)
    .fetch_optional(&mut *tx)
    .await?;

    if conflict.is_some() {
        return Err(AppError::SlotTaken(SLOT_TAKEN_MSG.into()));
    }

    let booking_id = Uuid::new_v4();
    let res = sqlx::query(
        r#"INSERT INTO bookings
        (id, user_id, turf_id, booking_date, start_hour, end_hour,
         duration_hours, total_amount, sport, players, status, payment_status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'confirmed', 'pending')"#,
    )
    .bind(booking_id)
    .bind(user_id)
    .bind(pending.turf_id)
    .bind(pending.booking_date)
    .bind(pending.start_hour)
    .bind(pending.end_hour)
    .bind(pending.duration_hours)
    .bind(pending.total_amount)
    .bind(&pending.sport)
    .bind(pending.players)
    .execute(&mut *tx)
    .await
    .map_err(as_slot_taken)?;

    if res.rows_affected() < 1 {
        return Err(AppError::Internal("Booking row was not created".into()));
    }

    tx.commit().await.map_err(as_slot_taken)?;

    Ok(booking_id)
}

/// SQLSTATE 40001 (serialization_failure) means a concurrent confirm won the
/// race after our re-check; report it as the same slot-taken conflict.
fn as_slot_taken(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.code().as_deref() == Some("40001") {
            return AppError::SlotTaken(SLOT_TAKEN_MSG.into());
        }
    }
    AppError::Database(e)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationOutcome {
    /// 24 hours or more before start.
    FullRefund,
    /// Less than 24 hours before start.
    FeeMayApply,
    /// Start time already passed; cancellation refused.
    PastBooking,
}

impl CancellationOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            CancellationOutcome::FullRefund => {
                "Booking cancelled successfully. Refund will be processed in 24-48 hours."
            }
            CancellationOutcome::FeeMayApply => {
                "Booking cancelled successfully. A cancellation fee may apply for bookings within 24 hours."
            }
            CancellationOutcome::PastBooking => "Cannot cancel past bookings.",
        }
    }
}

const TERMINAL_CANCEL_MSG: &str = "Booking not found or already cancelled.";

/// Full cancellation decision for an owned booking row: the status guard
/// first (a row that already left 'confirmed' is terminal and reports the
/// same not-found signal every time), then the time-to-start policy.
pub fn decide_cancellation(
    status: &str,
    now: DateTime<Utc>,
    booking_date: NaiveDate,
    start_hour: i32,
) -> AppResult<CancellationOutcome> {
    if status != "confirmed" {
        return Err(AppError::NotFound(TERMINAL_CANCEL_MSG.into()));
    }
    let outcome = evaluate_cancellation(now, booking_date, start_hour);
    if outcome == CancellationOutcome::PastBooking {
        return Err(AppError::PolicyRejection(outcome.message().into()));
    }
    Ok(outcome)
}

pub fn evaluate_cancellation(
    now: DateTime<Utc>,
    booking_date: NaiveDate,
    start_hour: i32,
) -> CancellationOutcome {
    // start_hour is validated to 0..=23 before a booking is ever written.
    let Some(start) = booking_date.and_hms_opt(start_hour as u32, 0, 0) else {
        return CancellationOutcome::PastBooking;
    };
    let hours_until = (start.and_utc() - now).num_seconds() as f64 / 3600.0;

    if hours_until < 0.0 {
        CancellationOutcome::PastBooking
    } else if hours_until < 24.0 {
        CancellationOutcome::FeeMayApply
    } else {
        CancellationOutcome::FullRefund
    }
}

/// Cancels a booking on behalf of its owner. Missing, foreign-owned and
/// already-cancelled bookings all collapse to the same not-found signal so
/// the caller learns nothing about other users' bookings. The row is never
/// deleted; status flips to 'cancelled' and stays there.
pub async fn cancel(
    db: &sqlx::PgPool,
    booking_id: Uuid,
    user_id: Uuid,
) -> AppResult<CancellationOutcome> {
    let row: Option<(NaiveDate, i32, String)> = sqlx::query_as(
        "SELECT booking_date, start_hour, status FROM bookings WHERE id = $1 AND user_id = $2",
    )
    .bind(booking_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    let Some((booking_date, start_hour, status)) = row else {
        return Err(AppError::NotFound("Booking not found.".into()));
    };

    let outcome = decide_cancellation(&status, Utc::now(), booking_date, start_hour)?;

    let res = sqlx::query(
        "UPDATE bookings SET status = 'cancelled' WHERE id = $1 AND status = 'confirmed'",
    )
    .bind(booking_id)
    .execute(db)
    .await?;

    if res.rows_affected() == 0 {
        // Lost a race with another cancel of the same row.
        return Err(AppError::NotFound(TERMINAL_CANCEL_MSG.into()));
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn exactly_24_hours_out_gets_full_refund() {
        let now = at(2026, 9, 1, 10, 0, 0);
        let outcome = evaluate_cancellation(now, date(2026, 9, 2), 10);
        assert_eq!(outcome, CancellationOutcome::FullRefund);
    }

    #[test]
    fn one_second_under_24_hours_flags_a_fee() {
        let now = at(2026, 9, 1, 10, 0, 1);
        let outcome = evaluate_cancellation(now, date(2026, 9, 2), 10);
        assert_eq!(outcome, CancellationOutcome::FeeMayApply);
    }

    #[test]
    fn booking_starting_right_now_flags_a_fee() {
        let now = at(2026, 9, 2, 10, 0, 0);
        let outcome = evaluate_cancellation(now, date(2026, 9, 2), 10);
        assert_eq!(outcome, CancellationOutcome::FeeMayApply);
    }

    #[test]
    fn started_booking_cannot_be_cancelled() {
        let now = at(2026, 9, 2, 10, 0, 1);
        let outcome = evaluate_cancellation(now, date(2026, 9, 2), 10);
        assert_eq!(outcome, CancellationOutcome::PastBooking);
    }

    #[test]
    fn far_future_booking_gets_full_refund() {
        let now = at(2026, 9, 1, 10, 0, 0);
        let outcome = evaluate_cancellation(now, date(2026, 9, 10), 6);
        assert_eq!(outcome, CancellationOutcome::FullRefund);
    }

    #[test]
    fn confirmed_booking_may_be_cancelled() {
        let now = at(2026, 9, 1, 10, 0, 0);
        let decision = decide_cancellation("confirmed", now, date(2026, 9, 10), 6);
        assert_eq!(decision.ok(), Some(CancellationOutcome::FullRefund));
    }

    #[test]
    fn second_cancel_of_the_same_booking_is_terminal() {
        let now = at(2026, 9, 1, 10, 0, 0);
        let decision = decide_cancellation("cancelled", now, date(2026, 9, 10), 6);
        assert!(matches!(decision, Err(AppError::NotFound(_))));
    }

    #[test]
    fn status_guard_runs_before_the_time_policy() {
        // An already-cancelled booking in the past still reports not-found,
        // never the past-booking rejection.
        let now = at(2026, 9, 2, 10, 0, 1);
        let decision = decide_cancellation("cancelled", now, date(2026, 9, 2), 10);
        assert!(matches!(decision, Err(AppError::NotFound(_))));
    }

    #[test]
    fn started_booking_cancel_is_a_policy_rejection() {
        let now = at(2026, 9, 2, 10, 0, 1);
        let decision = decide_cancellation("confirmed", now, date(2026, 9, 2), 10);
        assert!(matches!(decision, Err(AppError::PolicyRejection(_))));
    }
}
