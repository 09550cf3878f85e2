//! Login and the caller's own profile.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use helios_core::error::CoreError;
use helios_core::roles::Role;
use helios_db::models::user::{User, UserResponse};
use helios_db::repositories::{RoleRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Consecutive bad passwords that trigger a lock.
const MAX_FAILED_ATTEMPTS: i32 = 5;
const LOCK_DURATION_MINS: i32 = 15;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Seconds until `token` expires.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// `POST /api/v1/auth/login`
///
/// Unknown emails and wrong passwords get the same 401 so the endpoint does
/// not reveal which accounts exist. Deactivated and locked accounts get 403,
/// checked before the password so a locked account cannot be probed.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    input.validate()?;

    let Some(user) = UserRepo::find_by_email(&state.pool, input.email.trim()).await? else {
        return Err(invalid_credentials());
    };

    if !user.is_active {
        return Err(CoreError::Forbidden("Account is deactivated".into()).into());
    }
    if user.is_locked_at(Utc::now()) {
        return Err(CoreError::Forbidden(
            "Account is temporarily locked. Try again later.".into(),
        )
        .into());
    }

    let matches = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Stored password hash unusable: {e}")))?;
    if !matches {
        let outcome = UserRepo::record_failed_login(
            &state.pool,
            user.id,
            MAX_FAILED_ATTEMPTS,
            LOCK_DURATION_MINS,
        )
        .await?;
        match outcome.locked_until {
            Some(until) if outcome.failed_login_count >= MAX_FAILED_ATTEMPTS => {
                tracing::warn!(user_id = user.id, %until, "Account locked after repeated failed logins");
            }
            _ => tracing::debug!(
                user_id = user.id,
                failures = outcome.failed_login_count,
                "Failed login"
            ),
        }
        return Err(invalid_credentials());
    }

    let (role, role_name) = role_of(&state, &user).await?;
    let token = generate_access_token(user.id, role, user.client_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Could not sign access token: {e}")))?;
    UserRepo::record_successful_login(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, %role, client_id = ?user.client_id, "Login succeeded");

    Ok(Json(LoginResponse {
        token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserResponse::from_user(&user, role_name),
    }))
}

/// `GET /api/v1/auth/me`
///
/// A token outliving its account's deactivation is treated as no token.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| CoreError::Unauthorized("Account no longer active".into()))?;

    let role_name = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from_user(&user, role_name),
    }))
}

fn invalid_credentials() -> AppError {
    CoreError::Unauthorized("Invalid email or password".into()).into()
}

async fn role_of(state: &AppState, user: &User) -> AppResult<(Role, String)> {
    let role = RoleRepo::resolve(&state.pool, user.role_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!(
                "User {} has unrecognised role_id {}",
                user.id, user.role_id
            ))
        })?;
    Ok((role, role.as_str().to_string()))
}
