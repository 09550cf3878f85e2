//! Handlers for the `/dashboard` resource (per-client widget layout).
//!
//! Every mutation reads the current list, applies the change in memory and
//! writes the whole list back with the version it read. A concurrent edit in
//! between surfaces as 409 rather than being silently merged.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use helios_core::error::CoreError;
use helios_core::types::DbId;
use helios_core::widget::{
    move_adjacent, normalize_layout, normalize_widget, remove_at, MoveDirection, WidgetSpec,
    MAX_WIDGETS_PER_DASHBOARD,
};
use helios_db::models::widget::{DashboardLayout, LayoutReplace};
use helios_db::repositories::WidgetRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /dashboard/{client_id}/layout`.
#[derive(Debug, Deserialize)]
pub struct ReplaceLayoutRequest {
    pub widgets: Vec<WidgetSpec>,
    /// When set, the replacement only applies if the stored version matches.
    pub expected_version: Option<i32>,
}

/// Request body for `POST /dashboard/{client_id}/widgets/{position}/move`.
#[derive(Debug, Deserialize)]
pub struct MoveWidgetRequest {
    pub direction: MoveDirection,
}

/// GET /api/v1/dashboard/{client_id}
pub async fn get_layout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<DataResponse<DashboardLayout>>> {
    auth.actor().ensure_client_access(client_id)?;
    let layout = load_layout(&state, client_id).await?;
    Ok(Json(DataResponse { data: layout }))
}

/// PUT /api/v1/dashboard/{client_id}/layout
///
/// Replace the whole widget list. Positions follow the request order.
pub async fn replace_layout(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(client_id): Path<DbId>,
    Json(input): Json<ReplaceLayoutRequest>,
) -> AppResult<Json<DataResponse<DashboardLayout>>> {
    let widgets = normalize_layout(input.widgets)?;
    let layout = persist(&state, client_id, &widgets, input.expected_version).await?;
    Ok(Json(DataResponse { data: layout }))
}

/// POST /api/v1/dashboard/{client_id}/widgets
///
/// Append one widget at the end of the list.
pub async fn add_widget(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(client_id): Path<DbId>,
    Json(input): Json<WidgetSpec>,
) -> AppResult<(StatusCode, Json<DataResponse<DashboardLayout>>)> {
    let widget = normalize_widget(input)?;

    let current = load_layout(&state, client_id).await?;
    let mut widgets = to_specs(&current);
    if widgets.len() >= MAX_WIDGETS_PER_DASHBOARD {
        return Err(AppError::Core(CoreError::Validation(format!(
            "A dashboard may hold at most {MAX_WIDGETS_PER_DASHBOARD} widgets"
        ))));
    }
    widgets.push(widget);

    let layout = persist(&state, client_id, &widgets, Some(current.version)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: layout })))
}

/// POST /api/v1/dashboard/{client_id}/widgets/{position}/move
///
/// Swap the widget with its neighbour (`up` = towards position 0).
pub async fn move_widget(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((client_id, position)): Path<(DbId, usize)>,
    Json(input): Json<MoveWidgetRequest>,
) -> AppResult<Json<DataResponse<DashboardLayout>>> {
    let current = load_layout(&state, client_id).await?;
    let mut widgets = to_specs(&current);
    move_adjacent(&mut widgets, position, input.direction)?;

    let layout = persist(&state, client_id, &widgets, Some(current.version)).await?;
    Ok(Json(DataResponse { data: layout }))
}

/// DELETE /api/v1/dashboard/{client_id}/widgets/{position}
pub async fn delete_widget(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((client_id, position)): Path<(DbId, usize)>,
) -> AppResult<Json<DataResponse<DashboardLayout>>> {
    let current = load_layout(&state, client_id).await?;
    let mut widgets = to_specs(&current);
    remove_at(&mut widgets, position)?;

    let layout = persist(&state, client_id, &widgets, Some(current.version)).await?;
    Ok(Json(DataResponse { data: layout }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_layout(state: &AppState, client_id: DbId) -> AppResult<DashboardLayout> {
    WidgetRepo::get_layout(&state.pool, client_id)
        .await?
        .ok_or(AppError::not_found("Client", client_id))
}

fn to_specs(layout: &DashboardLayout) -> Vec<WidgetSpec> {
    layout
        .widgets
        .iter()
        .map(|w| WidgetSpec {
            widget_type: w.widget_type.clone(),
            title: w.title.clone(),
            data: w.data.clone(),
        })
        .collect()
}

async fn persist(
    state: &AppState,
    client_id: DbId,
    widgets: &[WidgetSpec],
    expected_version: Option<i32>,
) -> AppResult<DashboardLayout> {
    match WidgetRepo::replace_layout(&state.pool, client_id, widgets, expected_version).await? {
        LayoutReplace::Replaced(layout) => {
            tracing::debug!(
                client_id,
                version = layout.version,
                widgets = layout.widgets.len(),
                "Dashboard layout replaced"
            );
            Ok(layout)
        }
        LayoutReplace::VersionMismatch { current } => {
            Err(AppError::Core(CoreError::Conflict(format!(
                "Dashboard layout changed concurrently (current version {current})"
            ))))
        }
        LayoutReplace::ClientNotFound => Err(AppError::not_found("Client", client_id)),
    }
}
