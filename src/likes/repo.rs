use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

/// Result of a like toggle: the new state for this user plus the
/// post-mutation count.
#[derive(Debug, Serialize)]
pub struct LikeOutcome {
    pub liked: bool,
    pub like_count: i64,
}

/// Toggle a like for `(trip_id, user_id)`: first like inserts, repeat like
/// removes. One transaction; the unique constraint on the pair is the source
/// of truth, so a concurrent duplicate first-like loses the insert race and
/// takes the unlike path instead of erroring.
pub async fn toggle(db: &PgPool, trip_id: Uuid, user_id: Uuid) -> Result<LikeOutcome, AppError> {
    let mut tx = db.begin().await?;

    let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM trips WHERE id = $1")
        .bind(trip_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound("Trip not found".into()));
    }

    let inserted = sqlx::query(
        r#"
        INSERT INTO likes (trip_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (trip_id, user_id) DO NOTHING
        "#,
    )
    .bind(trip_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    let liked = if inserted.rows_affected() == 0 {
        // Already liked: this toggle is an unlike.
        sqlx::query("DELETE FROM likes WHERE trip_id = $1 AND user_id = $2")
            .bind(trip_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        false
    } else {
        true
    };

    let like_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE trip_id = $1")
            .bind(trip_id)
            .fetch_one(&mut *tx)
            .await?;

    tx.commit().await?;
    Ok(LikeOutcome { liked, like_count })
}
