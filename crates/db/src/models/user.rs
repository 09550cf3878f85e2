//! Portal account rows and DTOs.

use helios_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A `users` row.
///
/// Not `Serialize`: it holds the password hash. Handlers answer with
/// [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub client_id: Option<DbId>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A user as shown to API callers.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    /// Resolved role name (e.g. `"admin"`, `"client"`).
    pub role: String,
    pub role_id: DbId,
    pub client_id: Option<DbId>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl User {
    /// Whether a login lock is still in force at `now`.
    pub fn is_locked_at(&self, now: Timestamp) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }
}

impl UserResponse {
    pub fn from_user(user: &User, role: String) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role,
            role_id: user.role_id,
            client_id: user.client_id,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// Insert payload. `password_hash` is already an Argon2 PHC string.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub client_id: Option<DbId>,
}

/// Partial update; `None` leaves the column alone.
#[derive(Debug, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role_id: Option<DbId>,
    pub client_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// Outcome of [`UserRepo::record_failed_login`](crate::repositories::UserRepo::record_failed_login).
#[derive(Debug, Clone, FromRow)]
pub struct FailedLogin {
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn user(locked_until: Option<Timestamp>) -> User {
        let now = Utc::now();
        User {
            id: 1,
            email: "ops@agency.test".into(),
            name: "Ops".into(),
            password_hash: String::new(),
            role_id: 2,
            client_id: None,
            is_active: true,
            last_login_at: None,
            failed_login_count: 0,
            locked_until,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn lock_applies_only_until_expiry() {
        let now = Utc::now();
        assert!(!user(None).is_locked_at(now));
        assert!(user(Some(now + Duration::minutes(5))).is_locked_at(now));
        assert!(!user(Some(now - Duration::seconds(1))).is_locked_at(now));
    }
}
