use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::AppState;

/// Middleware: requires the authenticated user to hold the admin role.
/// The role is read from the users table, not trusted from the token.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))?;

    let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
        .bind(user.id)
        .fetch_optional(&state.db)
        .await?;

    match role.as_deref() {
        Some("admin") => {}
        _ => return Err(AppError::Forbidden("Admin access required".into())),
    }

    req.extensions_mut().insert(AuthUser {
        id: user.id,
        role,
    });

    Ok(next.run(req).await)
}
