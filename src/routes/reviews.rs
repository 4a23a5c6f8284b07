use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::models::review::PostReviewRequest;
use crate::services::ratings;
use crate::AppState;

pub async fn submit_review(
    State(state): State<AppState>,
    user: axum::Extension<AuthUser>,
    Path(turf_id): Path<Uuid>,
    Json(body): Json<PostReviewRequest>,
) -> AppResult<Json<Value>> {
    let review = ratings::submit_review(
        &state.db,
        user.id,
        turf_id,
        body.rating,
        body.comment.as_deref(),
    )
    .await?;

    let (rating, review_count): (f64, i32) =
        sqlx::query_as("SELECT rating, review_count FROM turfs WHERE id = $1")
            .bind(turf_id)
            .fetch_one(&state.db)
            .await?;

    Ok(Json(json!({
        "review": review,
        "turfRating": rating,
        "reviewCount": review_count
    })))
}
