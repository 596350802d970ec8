use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::User;

/// Account listing entry for the admin dashboard. Exposes the moderation
/// fields but never the credential material.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub has_google_login: bool,
    pub created_at: OffsetDateTime,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            is_admin: u.is_admin,
            has_google_login: u.google_id.is_some(),
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_view_hides_credentials() {
        let user = User {
            id: Uuid::new_v4(),
            username: "root".into(),
            email: "root@example.com".into(),
            password_hash: Some("argon2-material".into()),
            google_id: Some("google-123".into()),
            is_admin: true,
            created_at: OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_string(&UserView::from(user)).unwrap();
        assert!(!json.contains("argon2-material"));
        assert!(!json.contains("google-123"));
        assert!(json.contains("has_google_login"));
    }
}
