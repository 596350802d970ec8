use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{repo::User, AuthUser},
    error::AppError,
    state::AppState,
    trips::repo::{ModeratedTripView, Trip},
};

use super::dto::UserView;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/users/:id", delete(delete_user))
        .route("/admin/trips", get(list_trips))
        .route("/admin/trips/:id", delete(delete_trip))
        .route("/admin/trips/:id/flag", put(flag_trip))
        .route("/admin/trips/:id/unflag", put(unflag_trip))
}

/// Admin gate: a fresh read of the caller's row per request, so revoking the
/// flag (or deleting the account) takes effect immediately regardless of any
/// outstanding token.
pub async fn require_admin(db: &PgPool, user_id: Uuid) -> Result<User, AppError> {
    let user = User::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    if !user.is_admin {
        warn!(user_id = %user_id, "admin gate rejected");
        return Err(AppError::Forbidden("Admin privileges required".into()));
    }
    Ok(user)
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<UserView>>, AppError> {
    require_admin(&state.db, caller).await?;
    let users = User::list_all(&state.db).await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_admin(&state.db, caller).await?;
    // Self-deletion is allowed; the session dies at the next gate check.
    User::delete(&state.db, id).await?;
    info!(deleted_user_id = %id, admin_id = %caller, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_trips(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<ModeratedTripView>>, AppError> {
    require_admin(&state.db, caller).await?;
    let trips = Trip::list_all_for_admin(&state.db).await?;
    Ok(Json(trips))
}

#[instrument(skip(state))]
pub async fn delete_trip(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let admin = require_admin(&state.db, caller).await?;
    Trip::delete(&state.db, id, admin.id, true).await?;
    info!(trip_id = %id, admin_id = %caller, "trip force-deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn flag_trip(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_admin(&state.db, caller).await?;
    Trip::set_flagged(&state.db, id, true).await?;
    info!(trip_id = %id, admin_id = %caller, "trip flagged");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn unflag_trip(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_admin(&state.db, caller).await?;
    Trip::set_flagged(&state.db, id, false).await?;
    info!(trip_id = %id, admin_id = %caller, "trip unflagged");
    Ok(StatusCode::NO_CONTENT)
}
