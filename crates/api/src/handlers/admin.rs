//! Agency staff managing portal accounts under `/admin/users`.
//!
//! Every handler takes [`RequireAdmin`], so client-role callers never get
//! here. Passwords are only ever set at creation.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use helios_core::error::CoreError;
use helios_core::roles::{Role, CLIENT_ROLE_ID};
use helios_core::types::DbId;
use helios_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use helios_db::repositories::{ClientRepo, RoleRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{check_password_policy, hash_password};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Plain text; checked against the password policy, then hashed.
    pub password: String,
    pub role_id: DbId,
    /// Required for client-role users, rejected for everyone else.
    pub client_id: Option<DbId>,
}

/// Partial profile update. Omitted fields are left alone.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub role_id: Option<DbId>,
    pub client_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// `POST /api/v1/admin/users`
///
/// Emails are stored lowercased; a duplicate is 409 via `uq_users_email`.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;
    check_password_policy(&input.password, &input.email)?;

    let role = lookup_role(&state, input.role_id).await?;
    check_client_binding(&state, role, input.client_id).await?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Argon2 hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email.trim().to_lowercase(),
            name: input.name.trim().to_string(),
            password_hash,
            role_id: input.role_id,
            client_id: input.client_id,
        },
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        role = %role,
        created_by = admin.user_id,
        "User created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from_user(&user, role.as_str().to_string()),
        }),
    ))
}

/// `GET /api/v1/admin/users`, newest first.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let role_names: HashMap<DbId, String> = RoleRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|role| (role.id, role.name))
        .collect();

    let data = UserRepo::list(&state.pool)
        .await?
        .iter()
        .map(|user| {
            let name = role_names
                .get(&user.role_id)
                .cloned()
                .unwrap_or_else(|| "unknown".into());
            UserResponse::from_user(user, name)
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = existing_user(&state, id).await?;
    let role_name = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from_user(&user, role_name),
    }))
}

/// `PUT /api/v1/admin/users/{id}`
///
/// The binding rules are checked against the user as it will be after the
/// update: a client-role result needs a client from the request or the
/// existing row.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input.validate()?;
    if id == admin.user_id && input.is_active == Some(false) {
        return Err(cannot_deactivate_self());
    }

    let existing = existing_user(&state, id).await?;

    let role_id = input.role_id.unwrap_or(existing.role_id);
    let role = lookup_role(&state, role_id).await?;
    let client_id = if role_id == CLIENT_ROLE_ID {
        input.client_id.or(existing.client_id)
    } else {
        input.client_id
    };
    check_client_binding(&state, role, client_id).await?;

    let user = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            email: input.email.map(|e| e.trim().to_lowercase()),
            name: input.name.map(|n| n.trim().to_string()),
            role_id: input.role_id,
            client_id: input.client_id,
            is_active: input.is_active,
        },
    )
    .await?
    .ok_or(AppError::not_found("User", id))?;

    tracing::info!(user_id = id, role = %role, updated_by = admin.user_id, "User updated");

    Ok(Json(DataResponse {
        data: UserResponse::from_user(&user, role.as_str().to_string()),
    }))
}

/// `DELETE /api/v1/admin/users/{id}`
///
/// Deactivates rather than deletes; the row keeps its history. Repeating the
/// call on an inactive user is a no-op 204.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(cannot_deactivate_self());
    }

    if UserRepo::deactivate(&state.pool, id).await? {
        tracing::info!(user_id = id, deactivated_by = admin.user_id, "User deactivated");
    } else {
        existing_user(&state, id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn existing_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("User", id))
}

fn cannot_deactivate_self() -> AppError {
    CoreError::Validation("You cannot deactivate your own account".into()).into()
}

/// Resolve a role id to a known [`Role`], rejecting unknown ids as invalid input.
async fn lookup_role(state: &AppState, role_id: DbId) -> AppResult<Role> {
    RoleRepo::resolve(&state.pool, role_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!("Unknown role_id {role_id}")))
        })
}

/// Client-role users must name an existing client; admin-tier users must not.
async fn check_client_binding(
    state: &AppState,
    role: Role,
    client_id: Option<DbId>,
) -> AppResult<()> {
    match (role.is_admin_tier(), client_id) {
        (true, Some(_)) => Err(AppError::Core(CoreError::Validation(
            "Admin users cannot be bound to a client".into(),
        ))),
        (false, None) => Err(AppError::Core(CoreError::Validation(
            "Client users must have a client_id".into(),
        ))),
        (false, Some(id)) => {
            if ClientRepo::exists(&state.pool, id).await? {
                Ok(())
            } else {
                Err(AppError::not_found("Client", id))
            }
        }
        (true, None) => Ok(()),
    }
}
