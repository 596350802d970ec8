use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;
use crate::trips::dto::{CreateTripFields, UpdateTripFields};

/// Trip record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
    pub flagged: bool,
    pub user_id: Uuid,
}

/// Public listing entry: trip plus author name, like count and whether the
/// requesting viewer has liked it (always false for anonymous viewers).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TripView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
    pub user_id: Uuid,
    pub author: String,
    pub like_count: i64,
    pub liked_by_viewer: bool,
}

/// Moderation listing entry: adds the flag state to the public view.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ModeratedTripView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
    pub flagged: bool,
    pub user_id: Uuid,
    pub author: String,
    pub like_count: i64,
}

impl Trip {
    pub async fn list_all(db: &PgPool, viewer: Option<Uuid>) -> Result<Vec<TripView>, AppError> {
        let rows = sqlx::query_as::<_, TripView>(
            r#"
            SELECT t.id, t.title, t.description, t.location, t.image_url,
                   t.created_at, t.updated_at, t.user_id,
                   u.username AS author,
                   (SELECT COUNT(*) FROM likes l WHERE l.trip_id = t.id) AS like_count,
                   EXISTS (
                       SELECT 1 FROM likes l WHERE l.trip_id = t.id AND l.user_id = $1
                   ) AS liked_by_viewer
            FROM trips t
            JOIN users u ON u.id = t.user_id
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(viewer)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_mine(db: &PgPool, owner: Uuid) -> Result<Vec<TripView>, AppError> {
        let rows = sqlx::query_as::<_, TripView>(
            r#"
            SELECT t.id, t.title, t.description, t.location, t.image_url,
                   t.created_at, t.updated_at, t.user_id,
                   u.username AS author,
                   (SELECT COUNT(*) FROM likes l WHERE l.trip_id = t.id) AS like_count,
                   EXISTS (
                       SELECT 1 FROM likes l WHERE l.trip_id = t.id AND l.user_id = $1
                   ) AS liked_by_viewer
            FROM trips t
            JOIN users u ON u.id = t.user_id
            WHERE t.user_id = $1
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn get_one(
        db: &PgPool,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<TripView, AppError> {
        let row = sqlx::query_as::<_, TripView>(
            r#"
            SELECT t.id, t.title, t.description, t.location, t.image_url,
                   t.created_at, t.updated_at, t.user_id,
                   u.username AS author,
                   (SELECT COUNT(*) FROM likes l WHERE l.trip_id = t.id) AS like_count,
                   EXISTS (
                       SELECT 1 FROM likes l WHERE l.trip_id = t.id AND l.user_id = $1
                   ) AS liked_by_viewer
            FROM trips t
            JOIN users u ON u.id = t.user_id
            WHERE t.id = $2
            "#,
        )
        .bind(viewer)
        .bind(id)
        .fetch_optional(db)
        .await?;
        row.ok_or_else(|| AppError::NotFound("Trip not found".into()))
    }

    pub async fn create(
        db: &PgPool,
        owner: Uuid,
        fields: CreateTripFields,
    ) -> Result<Trip, AppError> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (title, description, location, image_url, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, location, image_url,
                      created_at, updated_at, flagged, user_id
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.location)
        .bind(&fields.image_url)
        .bind(owner)
        .fetch_one(db)
        .await?;
        Ok(trip)
    }

    /// Partial update: absent fields keep their prior value. The row is
    /// locked and the ownership check happens in the same transaction as the
    /// write.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        caller: Uuid,
        fields: UpdateTripFields,
    ) -> Result<Trip, AppError> {
        let mut tx = db.begin().await?;

        let owner = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM trips WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".into()))?;

        if owner != caller {
            return Err(AppError::Forbidden("You do not own this trip".into()));
        }

        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                image_url = COALESCE($5, image_url),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, description, location, image_url,
                      created_at, updated_at, flagged, user_id
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.location)
        .bind(&fields.image_url)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(trip)
    }

    /// Delete a trip and its likes. Owners may delete their own trips;
    /// admins may delete any.
    pub async fn delete(
        db: &PgPool,
        id: Uuid,
        caller: Uuid,
        caller_is_admin: bool,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let owner = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM trips WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".into()))?;

        if !caller_is_admin && owner != caller {
            return Err(AppError::Forbidden("You do not own this trip".into()));
        }

        sqlx::query("DELETE FROM likes WHERE trip_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Moderation flag state. Admin-only; the gate is enforced at the route.
    pub async fn set_flagged(db: &PgPool, id: Uuid, flagged: bool) -> Result<(), AppError> {
        let res = sqlx::query(
            "UPDATE trips SET flagged = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(flagged)
        .execute(db)
        .await?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Trip not found".into()));
        }
        Ok(())
    }

    pub async fn list_all_for_admin(db: &PgPool) -> Result<Vec<ModeratedTripView>, AppError> {
        let rows = sqlx::query_as::<_, ModeratedTripView>(
            r#"
            SELECT t.id, t.title, t.description, t.location, t.image_url,
                   t.created_at, t.updated_at, t.flagged, t.user_id,
                   u.username AS author,
                   (SELECT COUNT(*) FROM likes l WHERE l.trip_id = t.id) AS like_count
            FROM trips t
            JOIN users u ON u.id = t.user_id
            ORDER BY t.created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
