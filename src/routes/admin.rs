use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::turf::{CreateTurfRequest, Turf};
use crate::AppState;

pub async fn stats(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let total_turfs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM turfs")
        .fetch_one(&state.db)
        .await?;
    let total_users: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'user'")
            .fetch_one(&state.db)
            .await?;
    let total_bookings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(&state.db)
        .await?;
    let total_revenue: Option<i64> = sqlx::query_scalar(
        "SELECT SUM(total_amount)::bigint FROM bookings WHERE status = 'confirmed'",
    )
    .fetch_one(&state.db)
    .await?;

    let recent: Vec<(Uuid, chrono::NaiveDate, i32, i32, i32, String, String, String)> =
        sqlx::query_as(
            r#"SELECT b.id, b.booking_date, b.start_hour, b.end_hour, b.total_amount,
                b.status, u.name, t.name
            FROM bookings b
            JOIN users u ON b.user_id = u.id
            JOIN turfs t ON b.turf_id = t.id
            ORDER BY b.created_at DESC LIMIT 10"#,
        )
        .fetch_all(&state.db)
        .await?;

    let recent_bookings: Vec<Value> = recent
        .iter()
        .map(|(id, date, start, end, total, status, user_name, turf_name)| {
            json!({
                "id": id, "bookingDate": date, "startHour": start, "endHour": end,
                "totalAmount": total, "status": status,
                "userName": user_name, "turfName": turf_name
            })
        })
        .collect();

    Ok(Json(json!({
        "totalTurfs": total_turfs,
        "totalUsers": total_users,
        "totalBookings": total_bookings,
        "totalRevenue": total_revenue.unwrap_or(0),
        "recentBookings": recent_bookings,
    })))
}

pub async fn list_all_turfs(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let turfs: Vec<Turf> = sqlx::query_as("SELECT * FROM turfs ORDER BY name")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(json!({ "turfs": turfs })))
}

pub async fn create_turf(
    State(state): State<AppState>,
    Json(body): Json<CreateTurfRequest>,
) -> AppResult<Json<Value>> {
    if body.name.is_empty() || body.location.is_empty() || body.city.is_empty() {
        return Err(AppError::BadRequest("Name, location and city are required".into()));
    }
    if body.price_per_hour <= 0 {
        return Err(AppError::BadRequest("Price per hour must be positive".into()));
    }
    if body.sports.is_empty() {
        return Err(AppError::BadRequest("At least one sport is required".into()));
    }

    let id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO turfs
        (id, name, location, city, distance, open_hour, close_hour,
         max_players, price_per_hour, sports, amenities, description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"#,
    )
    .bind(id)
    .bind(&body.name)
    .bind(&body.location)
    .bind(&body.city)
    .bind(body.distance.unwrap_or(0.0))
    .bind(body.open_hour.unwrap_or(6))
    .bind(body.close_hour.unwrap_or(23))
    .bind(body.max_players.unwrap_or(22))
    .bind(body.price_per_hour)
    .bind(&body.sports)
    .bind(body.amenities.as_deref().unwrap_or(""))
    .bind(body.description.as_deref().unwrap_or(""))
    .execute(&state.db)
    .await?;

    Ok(Json(json!({ "id": id, "success": true })))
}

/// Soft delete: the turf stays referenced by historical bookings.
pub async fn deactivate_turf(
    State(state): State<AppState>,
    Path(turf_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let res = sqlx::query("UPDATE turfs SET is_active = FALSE WHERE id = $1")
        .bind(turf_id)
        .execute(&state.db)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound("Turf not found.".into()));
    }

    Ok(Json(json!({ "success": true })))
}

pub async fn list_all_bookings(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let rows: Vec<(
        Uuid,
        chrono::NaiveDate,
        i32,
        i32,
        i32,
        String,
        String,
        String,
        String,
    )> = sqlx::query_as(
        r#"SELECT b.id, b.booking_date, b.start_hour, b.end_hour, b.total_amount,
            b.status, b.payment_status, u.name, t.name
        FROM bookings b
        JOIN users u ON b.user_id = u.id
        JOIN turfs t ON b.turf_id = t.id
        ORDER BY b.booking_date DESC"#,
    )
    .fetch_all(&state.db)
    .await?;

    let bookings: Vec<Value> = rows
        .iter()
        .map(|(id, date, start, end, total, status, payment, user_name, turf_name)| {
            json!({
                "id": id, "bookingDate": date, "startHour": start, "endHour": end,
                "totalAmount": total, "status": status, "paymentStatus": payment,
                "userName": user_name, "turfName": turf_name
            })
        })
        .collect();

    Ok(Json(json!({ "bookings": bookings })))
}

pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let rows: Vec<(Uuid, String, String, Option<String>, String, chrono::DateTime<chrono::Utc>)> =
        sqlx::query_as(
            "SELECT id, name, email, phone, role, created_at FROM users ORDER BY created_at DESC",
        )
        .fetch_all(&state.db)
        .await?;

    let users: Vec<Value> = rows
        .iter()
        .map(|(id, name, email, phone, role, created)| {
            json!({
                "id": id, "name": name, "email": email,
                "phone": phone, "role": role, "createdAt": created
            })
        })
        .collect();

    Ok(Json(json!({ "users": users })))
}
