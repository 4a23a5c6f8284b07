use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::cache::slots_key;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::models::booking::{slot_cost, Booking, PendingBooking, SlotRequest};
use crate::models::turf::Turf;
use crate::services::{availability, booking};
use crate::AppState;

/// Stage a slot request. On success the validated draft replaces any
/// existing one for this user and waits for an explicit confirm; nothing is
/// written to the ledger yet.
pub async fn request_slot(
    State(state): State<AppState>,
    user: axum::Extension<AuthUser>,
    Path(turf_id): Path<Uuid>,
    Json(body): Json<SlotRequest>,
) -> AppResult<Json<Value>> {
    if body.sport.is_empty() {
        return Err(AppError::BadRequest("Please fill in all required fields.".into()));
    }

    let turf: Turf = sqlx::query_as("SELECT * FROM turfs WHERE id = $1")
        .bind(turf_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Turf not found.".into()))?;

    availability::validate_slot(
        &turf,
        body.booking_date,
        body.start_hour,
        body.end_hour,
        body.players,
    )?;

    if availability::find_conflict(
        &state.db,
        turf_id,
        body.booking_date,
        body.start_hour,
        body.end_hour,
    )
    .await?
    .is_some()
    {
        return Err(AppError::Conflict(
            "This slot is already booked. Please choose another time.".into(),
        ));
    }

    let (duration_hours, total_amount) =
        slot_cost(body.start_hour, body.end_hour, turf.price_per_hour);

    let pending = PendingBooking {
        turf_id,
        turf_name: turf.name.clone(),
        turf_location: turf.location.clone(),
        price_per_hour: turf.price_per_hour,
        booking_date: body.booking_date,
        start_hour: body.start_hour,
        end_hour: body.end_hour,
        duration_hours,
        total_amount,
        sport: body.sport,
        players: body.players,
        created_at: Utc::now(),
    };

    state.staging.put(user.id, pending.clone()).await;

    Ok(Json(json!({ "pending": pending })))
}

pub async fn get_pending(
    State(state): State<AppState>,
    user: axum::Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let pending = state
        .staging
        .get(user.id)
        .await
        .ok_or_else(|| AppError::NotFound("No pending booking found.".into()))?;

    Ok(Json(json!({ "pending": pending })))
}

/// Confirm the staged booking. The availability re-check and the insert run
/// as one atomic unit against the ledger; losing the race discards the draft
/// and reports the confirm-time conflict.
pub async fn confirm(
    State(state): State<AppState>,
    user: axum::Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let pending = state
        .staging
        .take(user.id)
        .await
        .ok_or_else(|| AppError::NotFound("No pending booking found.".into()))?;

    let booking_id = booking::commit_pending(&state.db, user.id, &pending).await?;

    state
        .cache
        .del(&slots_key(pending.turf_id, pending.booking_date))
        .await;

    tracing::info!(
        booking_id = %booking_id,
        turf_id = %pending.turf_id,
        date = %pending.booking_date,
        "booking confirmed"
    );

    Ok(Json(json!({
        "id": booking_id,
        "status": "confirmed",
        "paymentStatus": "pending",
        "totalAmount": pending.total_amount,
        "message": "Booking confirmed successfully! Your booking is now active."
    })))
}

pub async fn abandon(
    State(state): State<AppState>,
    user: axum::Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let existed = state.staging.clear(user.id).await;
    Ok(Json(json!({ "cleared": existed })))
}

pub async fn list_my_bookings(
    State(state): State<AppState>,
    user: axum::Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let rows: Vec<(
        Uuid,
        Uuid,
        chrono::NaiveDate,
        i32,
        i32,
        i32,
        i32,
        String,
        i32,
        String,
        String,
        String,
        String,
    )> = sqlx::query_as(
        r#"SELECT b.id, b.turf_id, b.booking_date, b.start_hour, b.end_hour,
            b.duration_hours, b.total_amount, b.sport, b.players, b.status,
            b.payment_status, t.name, t.location
        FROM bookings b JOIN turfs t ON b.turf_id = t.id
        WHERE b.user_id = $1
        ORDER BY b.booking_date DESC, b.start_hour DESC"#,
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    let today = Utc::now().date_naive();
    let (mut upcoming, mut past) = (Vec::new(), Vec::new());
    for (id, turf_id, date, start, end, duration, total, sport, players, status, payment, turf_name, location) in rows {
        let entry = json!({
            "id": id, "turfId": turf_id, "turfName": turf_name, "location": location,
            "bookingDate": date, "startHour": start, "endHour": end,
            "durationHours": duration, "totalAmount": total, "sport": sport,
            "players": players, "status": status, "paymentStatus": payment
        });
        if date >= today && status == "confirmed" {
            upcoming.push(entry);
        } else {
            past.push(entry);
        }
    }

    Ok(Json(json!({ "upcoming": upcoming, "past": past })))
}

pub async fn receipt(
    State(state): State<AppState>,
    user: axum::Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let booking: Booking =
        sqlx::query_as("SELECT * FROM bookings WHERE id = $1 AND user_id = $2")
            .bind(booking_id)
            .bind(user.id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found.".into()))?;

    let (turf_name, location, amenities): (String, String, String) =
        sqlx::query_as("SELECT name, location, amenities FROM turfs WHERE id = $1")
            .bind(booking.turf_id)
            .fetch_one(&state.db)
            .await?;

    Ok(Json(json!({
        "booking": booking,
        "turf": { "name": turf_name, "location": location, "amenities": amenities }
    })))
}

pub async fn cancel(
    State(state): State<AppState>,
    user: axum::Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let outcome = booking::cancel(&state.db, booking_id, user.id).await?;

    // The slot reopened; drop the cached projection for that day.
    let row: Option<(Uuid, chrono::NaiveDate)> =
        sqlx::query_as("SELECT turf_id, booking_date FROM bookings WHERE id = $1")
            .bind(booking_id)
            .fetch_optional(&state.db)
            .await?;
    if let Some((turf_id, date)) = row {
        state.cache.del(&slots_key(turf_id, date)).await;
    }

    Ok(Json(json!({
        "status": "cancelled",
        "message": outcome.message()
    })))
}
