//! Handlers for the `/clients` resource (tenant registry).
//!
//! Reads are tenant-scoped: admins see every client, client-role callers only
//! their own. Writes require an admin-tier role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use helios_core::client::{
    normalize_client_name, validate_hex_color, validate_status_transition, ClientStatus,
};
use helios_core::error::CoreError;
use helios_core::types::{DbId, StatusId};
use helios_db::models::client::{Client, CreateClient, UpdateClient};
use helios_db::repositories::ClientRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /clients`.
#[derive(Debug, Deserialize)]
pub struct ClientListParams {
    /// Lifecycle status name (`onboarding`, `active`, `archived`).
    pub status: Option<String>,
}

/// A client row with its lifecycle status name resolved.
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    #[serde(flatten)]
    pub client: Client,
    pub status: &'static str,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        let status = ClientStatus::from_id(client.status_id)
            .map(ClientStatus::name)
            .unwrap_or("unknown");
        Self { client, status }
    }
}

/// POST /api/v1/clients
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(mut input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<DataResponse<ClientResponse>>)> {
    input.name = normalize_client_name(&input.name)?;
    validate_branding(input.primary_color.as_deref(), input.secondary_color.as_deref())?;
    if let Some(status_id) = input.status_id {
        ClientStatus::from_id(status_id)?;
    }

    let client = ClientRepo::create(&state.pool, &input).await?;
    tracing::info!(client_id = client.id, created_by = admin.user_id, "Client created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: client.into(),
        }),
    ))
}

/// GET /api/v1/clients
///
/// Admins get every client (optionally filtered by `?status=`); client-role
/// callers get a list holding only their own client.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ClientListParams>,
) -> AppResult<Json<DataResponse<Vec<ClientResponse>>>> {
    let status_id: Option<StatusId> = params
        .status
        .as_deref()
        .map(ClientStatus::from_name)
        .transpose()?
        .map(ClientStatus::id);

    let actor = auth.actor();
    let clients = match actor.scope_filter(None)? {
        None => ClientRepo::list(&state.pool, status_id).await?,
        Some(own) => ClientRepo::find_by_id(&state.pool, own)
            .await?
            .into_iter()
            .filter(|c| status_id.map_or(true, |s| c.status_id == s))
            .collect(),
    };

    Ok(Json(DataResponse {
        data: clients.into_iter().map(ClientResponse::from).collect(),
    }))
}

/// GET /api/v1/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ClientResponse>>> {
    auth.actor().ensure_client_access(id)?;
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Client", id))?;
    Ok(Json(DataResponse {
        data: client.into(),
    }))
}

/// PUT /api/v1/clients/{id}
///
/// Partial update. A lifecycle change must be an allowed transition.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateClient>,
) -> AppResult<Json<DataResponse<ClientResponse>>> {
    let existing = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Client", id))?;

    if let Some(name) = input.name.as_deref() {
        input.name = Some(normalize_client_name(name)?);
    }
    validate_branding(input.primary_color.as_deref(), input.secondary_color.as_deref())?;

    let transition = match input.status_id {
        Some(target) => {
            let from = ClientStatus::from_id(existing.status_id)?;
            let to = ClientStatus::from_id(target)?;
            validate_status_transition(from, to)?;
            (from != to).then_some((from, to))
        }
        None => None,
    };

    // A status change is written only if the status it was validated against
    // is still current.
    let guard = input.status_id.map(|_| existing.status_id);
    let Some(client) = ClientRepo::update(&state.pool, id, &input, guard).await? else {
        return Err(if guard.is_some() && ClientRepo::exists(&state.pool, id).await? {
            CoreError::Conflict("Client status changed concurrently; reload and retry".into())
                .into()
        } else {
            AppError::not_found("Client", id)
        });
    };
    if let Some((from, to)) = transition {
        tracing::info!(client_id = id, from = from.name(), to = to.name(), "Client status changed");
    }
    Ok(Json(DataResponse {
        data: client.into(),
    }))
}

/// DELETE /api/v1/clients/{id}
///
/// Permanent delete. The client's users, status entries, notifications and
/// widgets go with it.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ClientRepo::hard_delete(&state.pool, id).await? {
        tracing::info!(client_id = id, deleted_by = admin.user_id, "Client deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Client", id))
    }
}

fn validate_branding(primary: Option<&str>, secondary: Option<&str>) -> AppResult<()> {
    if let Some(color) = primary {
        validate_hex_color("primary_color", color)?;
    }
    if let Some(color) = secondary {
        validate_hex_color("secondary_color", color)?;
    }
    Ok(())
}
