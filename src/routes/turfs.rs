use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::cache::slots_key;
use crate::error::{AppError, AppResult};
use crate::models::booking::hour_label;
use crate::models::turf::{BookedSlot, Turf, TurfFilters};
use crate::services::availability;
use crate::AppState;

pub async fn list_turfs(
    State(state): State<AppState>,
    Query(filters): Query<TurfFilters>,
) -> AppResult<Json<Value>> {
    let mut qb = sqlx::QueryBuilder::new("SELECT * FROM turfs WHERE is_active = TRUE");

    if let Some(location) = filters.location.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{location}%");
        qb.push(" AND (location ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR city ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
    if let Some(sport) = filters.sport.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND sports ILIKE ");
        qb.push_bind(format!("%{sport}%"));
    }
    if let Some(min_price) = filters.min_price {
        qb.push(" AND price_per_hour >= ");
        qb.push_bind(min_price);
    }
    if let Some(max_price) = filters.max_price {
        qb.push(" AND price_per_hour <= ");
        qb.push_bind(max_price);
    }

    qb.push(match filters.sort.as_deref() {
        Some("price_asc") => " ORDER BY price_per_hour ASC",
        Some("price_desc") => " ORDER BY price_per_hour DESC",
        Some("distance") => " ORDER BY distance ASC",
        _ => " ORDER BY rating DESC",
    });

    let turfs: Vec<Turf> = qb.build_query_as().fetch_all(&state.db).await?;

    Ok(Json(json!({ "turfs": turfs })))
}

pub async fn featured_turfs(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let turfs: Vec<Turf> = sqlx::query_as(
        "SELECT * FROM turfs WHERE is_active = TRUE ORDER BY rating DESC LIMIT 6",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(json!({ "turfs": turfs })))
}

pub async fn get_turf(
    State(state): State<AppState>,
    Path(turf_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let turf: Turf = sqlx::query_as("SELECT * FROM turfs WHERE id = $1")
        .bind(turf_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Turf not found.".into()))?;

    let rows: Vec<(Uuid, i32, Option<String>, chrono::DateTime<chrono::Utc>, String)> =
        sqlx::query_as(
            r#"SELECT r.id, r.rating, r.comment, r.created_at, u.name
            FROM reviews r JOIN users u ON r.user_id = u.id
            WHERE r.turf_id = $1 ORDER BY r.created_at DESC"#,
        )
        .bind(turf_id)
        .fetch_all(&state.db)
        .await?;

    let reviews: Vec<Value> = rows
        .iter()
        .map(|(id, rating, comment, created, name)| {
            json!({"id": id, "rating": rating, "comment": comment, "createdAt": created, "userName": name})
        })
        .collect();

    Ok(Json(json!({ "turf": turf, "reviews": reviews })))
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

/// Public projection of the conflict set: the already-booked intervals for a
/// turf on a date, so front-ends can grey out taken slots.
pub async fn booked_slots(
    State(state): State<AppState>,
    Path(turf_id): Path<Uuid>,
    Query(q): Query<SlotsQuery>,
) -> AppResult<Json<Value>> {
    let key = slots_key(turf_id, q.date);
    if let Some(cached) = state.cache.get_json::<Vec<BookedSlot>>(&key).await {
        return Ok(Json(json!({ "booked": cached })));
    }

    let intervals = availability::booked_intervals(&state.db, turf_id, q.date).await?;
    let booked: Vec<BookedSlot> = intervals
        .into_iter()
        .map(|(start, end)| BookedSlot {
            start: hour_label(start),
            end: hour_label(end),
        })
        .collect();

    state
        .cache
        .set_json(&key, &booked, state.config.booking.slot_cache_secs)
        .await;

    Ok(Json(json!({ "booked": booked })))
}
