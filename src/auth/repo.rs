use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{auth::password, error::AppError};

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>, // absent for Google-only accounts
    pub google_id: Option<String>,
    pub is_admin: bool,
    pub created_at: OffsetDateTime,
}

impl User {
    /// Check a plaintext password against the stored hash. Accounts without a
    /// password hash (Google-only) never match.
    pub fn verify_password(&self, plain: &str) -> anyhow::Result<bool> {
        password::verify_password(plain, self.password_hash.as_deref())
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, google_id, is_admin, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, google_id, is_admin, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Combined signup collision lookup: one query over both unique columns.
    pub async fn find_by_username_or_email(
        db: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, google_id, is_admin, created_at
            FROM users
            WHERE username = $1 OR email = $2
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a password-authenticated user. A unique-index race with a
    /// concurrent signup surfaces as Conflict, same as the pre-check.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, google_id, is_admin, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(
                "Username or email already exists".into(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve a provider-verified Google identity to a local account,
    /// creating one on first sign-in. Idempotent: concurrent first sign-ins
    /// collapse onto the unique email index and re-read the winner's row.
    pub async fn find_or_create_oauth(
        db: &PgPool,
        email: &str,
        display_name: &str,
        google_id: &str,
    ) -> Result<User, AppError> {
        if let Some(user) = Self::find_by_email(db, email).await? {
            return Ok(user);
        }

        sqlx::query(
            r#"
            INSERT INTO users (username, email, google_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(display_name)
        .bind(email)
        .bind(google_id)
        .execute(db)
        .await?;

        Self::find_by_email(db, email)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("oauth upsert lost its row")))
    }

    pub async fn list_all(db: &PgPool) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, google_id, is_admin, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    /// Delete a user and everything hanging off them: likes they made, likes
    /// on their trips, their trips, then the row itself. One transaction;
    /// ordering keeps the foreign keys satisfied at every step.
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM likes
            WHERE user_id = $1
               OR trip_id IN (SELECT id FROM trips WHERE user_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM trips WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".into()));
        }

        tx.commit().await?;
        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(password_hash: Option<String>) -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash,
            google_id: None,
            is_admin: false,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn verify_password_matches_own_hash() {
        let hash = password::hash_password("pw-123456").unwrap();
        let user = sample_user(Some(hash));
        assert!(user.verify_password("pw-123456").unwrap());
        assert!(!user.verify_password("pw-654321").unwrap());
    }

    #[test]
    fn verify_password_is_false_without_hash() {
        // Google-only accounts have no hash; verification is a clean false.
        let user = sample_user(None);
        assert!(!user.verify_password("anything").unwrap());
    }

    #[test]
    fn serialized_user_never_leaks_password_hash() {
        let user = sample_user(Some("argon2-secret".into()));
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2-secret"));
        assert!(json.contains("alice"));
    }
}
