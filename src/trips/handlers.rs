use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{repo::User, AuthUser, MaybeAuthUser},
    error::AppError,
    state::AppState,
    trips::{
        dto::{CreateTripFields, CreateTripRequest, UpdateTripFields},
        repo::{Trip, TripView},
    },
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list_trips))
        .route("/trips/my-posts", get(my_trips))
        .route("/trips/:id", get(get_trip))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/trips", post(create_trip))
        .route("/trips/:id", patch(update_trip).delete(delete_trip))
}

#[instrument(skip(state))]
pub async fn list_trips(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
) -> Result<Json<Vec<TripView>>, AppError> {
    let trips = Trip::list_all(&state.db, viewer).await?;
    Ok(Json(trips))
}

#[instrument(skip(state))]
pub async fn get_trip(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TripView>, AppError> {
    let trip = Trip::get_one(&state.db, id, viewer).await?;
    Ok(Json(trip))
}

#[instrument(skip(state))]
pub async fn my_trips(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<TripView>>, AppError> {
    let trips = Trip::list_mine(&state.db, user_id).await?;
    Ok(Json(trips))
}

#[instrument(skip(state, payload))]
pub async fn create_trip(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<Trip>), AppError> {
    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Title is required".into()))?
        .to_string();

    let trip = Trip::create(
        &state.db,
        user_id,
        CreateTripFields {
            title,
            description: payload.description,
            location: payload.location,
            image_url: payload.image_url,
        },
    )
    .await?;

    info!(trip_id = %trip.id, user_id = %user_id, "trip created");
    Ok((StatusCode::CREATED, Json(trip)))
}

#[instrument(skip(state, payload))]
pub async fn update_trip(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTripFields>,
) -> Result<Json<Trip>, AppError> {
    let trip = Trip::update(&state.db, id, user_id, payload).await?;
    info!(trip_id = %trip.id, user_id = %user_id, "trip updated");
    Ok(Json(trip))
}

#[instrument(skip(state))]
pub async fn delete_trip(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    // Admin override needs the caller's record, not just their id.
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    Trip::delete(&state.db, id, user.id, user.is_admin).await?;
    info!(trip_id = %id, user_id = %user_id, "trip deleted");
    Ok(StatusCode::NO_CONTENT)
}
