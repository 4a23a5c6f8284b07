use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub turf_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_hour: i32,
    pub end_hour: i32,
    pub duration_hours: i32,
    pub total_amount: i32,
    pub sport: String,
    pub players: i32,
    pub status: String,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}

/// A validated slot request staged against the user's session, pending an
/// explicit confirm. Carries a snapshot of the turf fields shown on the
/// confirmation screen so a later price edit cannot change what was quoted.
#[derive(Debug, Clone, Serialize)]
pub struct PendingBooking {
    pub turf_id: Uuid,
    pub turf_name: String,
    pub turf_location: String,
    pub price_per_hour: i32,
    pub booking_date: NaiveDate,
    pub start_hour: i32,
    pub end_hour: i32,
    pub duration_hours: i32,
    pub total_amount: i32,
    pub sport: String,
    pub players: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SlotRequest {
    #[serde(rename = "bookingDate")]
    pub booking_date: NaiveDate,
    #[serde(rename = "startHour")]
    pub start_hour: i32,
    #[serde(rename = "endHour")]
    pub end_hour: i32,
    pub sport: String,
    pub players: i32,
}

/// Duration and total amount for a slot, frozen at staging time.
pub fn slot_cost(start_hour: i32, end_hour: i32, price_per_hour: i32) -> (i32, i32) {
    let duration = end_hour - start_hour;
    (duration, duration * price_per_hour)
}

/// Display label for an hour boundary, e.g. 9 -> "09:00".
pub fn hour_label(hour: i32) -> String {
    format!("{hour:02}:00")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_cost_freezes_amount_at_quote_time() {
        // 2 hours at 1200/hr
        let (duration, total) = slot_cost(9, 11, 1200);
        assert_eq!(duration, 2);
        assert_eq!(total, 2400);

        // single hour
        let (duration, total) = slot_cost(17, 18, 800);
        assert_eq!(duration, 1);
        assert_eq!(total, 800);
    }

    #[test]
    fn hour_label_pads_to_two_digits() {
        assert_eq!(hour_label(6), "06:00");
        assert_eq!(hour_label(23), "23:00");
    }
}
