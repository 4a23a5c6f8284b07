use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let db_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();
    let cache_ok = state.cache.health_check().await;

    Json(json!({
        "status": if db_ok && cache_ok { "ok" } else { "degraded" },
        "db": db_ok,
        "cache": cache_ok,
    }))
}
