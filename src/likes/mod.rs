pub mod repo;

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::AuthUser, error::AppError, state::AppState};

use self::repo::LikeOutcome;

pub fn router() -> Router<AppState> {
    Router::new().route("/trips/:id/like", post(toggle_like))
}

#[instrument(skip(state))]
pub async fn toggle_like(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<LikeOutcome>, AppError> {
    let outcome = repo::toggle(&state.db, trip_id, user_id).await?;
    info!(
        trip_id = %trip_id,
        user_id = %user_id,
        liked = outcome.liked,
        like_count = outcome.like_count,
        "like toggled"
    );
    Ok(Json(outcome))
}
