//! Handlers for the `/notifications` resource (blocking alerts).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use helios_core::error::CoreError;
use helios_core::status_log::MAX_NOTE_LENGTH;
use helios_core::types::DbId;
use helios_db::models::notification::{
    BlockingNotification, CreateNotification, NotificationFilter,
};
use helios_db::repositories::{ClientRepo, NotificationRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationListParams {
    pub client_id: Option<DbId>,
    pub resolved: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /notifications/open-count`.
#[derive(Debug, Deserialize)]
pub struct OpenCountParams {
    pub client_id: Option<DbId>,
}

/// Request body for `POST /notifications`.
#[derive(Debug, Deserialize)]
pub struct RaiseNotificationRequest {
    /// Defaults to the caller's own client for client-role callers.
    pub client_id: Option<DbId>,
    pub message: String,
}

/// Response for `GET /notifications/open-count`.
#[derive(Debug, Serialize)]
pub struct OpenCount {
    pub open: i64,
}

/// GET /api/v1/notifications
///
/// Newest first. Client-role callers only ever see their own client's alerts.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<NotificationListParams>,
) -> AppResult<Json<DataResponse<Vec<BlockingNotification>>>> {
    let filter = NotificationFilter {
        client_id: auth.actor().scope_filter(params.client_id)?,
        is_resolved: params.resolved,
    };
    let page = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    };

    let items = NotificationRepo::list(&state.pool, &filter, page.limit(), page.offset()).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/notifications/open-count
pub async fn open_count(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<OpenCountParams>,
) -> AppResult<Json<DataResponse<OpenCount>>> {
    let client_id = auth.actor().scope_filter(params.client_id)?;
    let open = NotificationRepo::open_count(&state.pool, client_id).await?;
    Ok(Json(DataResponse {
        data: OpenCount { open },
    }))
}

/// POST /api/v1/notifications
///
/// Raise a blocking alert by hand. Admins must name the client.
pub async fn raise(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<RaiseNotificationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BlockingNotification>>)> {
    let actor = auth.actor();
    let client_id = actor.scope_filter(input.client_id)?.ok_or_else(|| {
        AppError::Core(CoreError::Validation("client_id is required".into()))
    })?;

    let message = input.message.trim();
    if message.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Message must not be empty".into(),
        )));
    }
    if message.chars().count() > MAX_NOTE_LENGTH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Message must be at most {MAX_NOTE_LENGTH} characters"
        ))));
    }

    if !ClientRepo::exists(&state.pool, client_id).await? {
        return Err(AppError::not_found("Client", client_id));
    }

    let notification = NotificationRepo::create(
        &state.pool,
        &CreateNotification {
            client_id,
            status_entry_id: None,
            message: message.to_string(),
            raised_by: Some(actor.user_id),
        },
    )
    .await?;

    tracing::info!(
        notification_id = notification.id,
        client_id,
        raised_by = actor.user_id,
        "Blocking notification raised"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: notification }),
    ))
}

/// PUT /api/v1/notifications/{id}/resolve
///
/// Resolving an already resolved alert overwrites the resolver and time.
pub async fn resolve(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BlockingNotification>>> {
    let notification = NotificationRepo::resolve(&state.pool, id, admin.user_id)
        .await?
        .ok_or(AppError::not_found("Notification", id))?;

    tracing::info!(notification_id = id, resolved_by = admin.user_id, "Notification resolved");
    Ok(Json(DataResponse { data: notification }))
}
