//! Handlers for the `/calendar` resource (daily status log).
//!
//! The write path is `upsert`: one entry per client and UTC day, written
//! atomically, with a blocking notification raised for `blocked` entries.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use helios_core::error::CoreError;
use helios_core::status_log::{
    normalize_date_range, normalize_entry_date, normalize_notes, EntryStatus, NoteInput,
    MAX_NOTE_LENGTH,
};
use helios_core::types::DbId;
use helios_db::models::client::Client;
use helios_db::models::notification::CreateNotification;
use helios_db::models::status_entry::{StatusEntry, UpsertStatusEntry};
use helios_db::repositories::{ClientRepo, NotificationRepo, StatusEntryRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /calendar`.
#[derive(Debug, Deserialize)]
pub struct UpsertEntryRequest {
    pub client_id: DbId,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub date: String,
    /// Canonical value or a legacy alias (`green`, `red`, `yellow`, ...).
    pub status: String,
    #[serde(default, alias = "description")]
    pub details: Option<String>,
    #[serde(default)]
    pub notes: Vec<NoteInput>,
}

/// POST /api/v1/calendar
///
/// Create or overwrite the entry for `(client_id, day)`. Returns 201 when the
/// entry was created and 200 when an existing one was overwritten.
pub async fn upsert(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpsertEntryRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<StatusEntry>>)> {
    let actor = auth.actor();

    // Scope comes first: a foreign tenant gets 403 for any status value, and
    // a client-role caller cannot probe which client ids exist.
    actor.ensure_client_access(input.client_id)?;

    let client = ClientRepo::find_by_id(&state.pool, input.client_id)
        .await?
        .ok_or(AppError::not_found("Client", input.client_id))?;

    let status = EntryStatus::parse(&input.status)?;
    let notes = normalize_notes(&input.notes)?;
    actor.ensure_status_write(client.id, status)?;

    let entry_date = normalize_entry_date(&input.date)?;
    let details = input.details.unwrap_or_default().trim().to_string();

    let upserted = StatusEntryRepo::upsert(
        &state.pool,
        &UpsertStatusEntry {
            client_id: client.id,
            entry_date,
            status,
            details,
            notes,
            author_id: actor.user_id,
        },
    )
    .await?;

    let entry = upserted.entry;
    tracing::debug!(
        entry_id = entry.id,
        client_id = client.id,
        %entry_date,
        %status,
        inserted = upserted.inserted,
        "Status entry written"
    );

    if status.is_blocked() {
        raise_blocker(&state, &client, &entry, actor.user_id).await;
    }

    let code = if upserted.inserted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((code, Json(DataResponse { data: entry })))
}

/// GET /api/v1/calendar/{client_id}?start_date=&end_date=
///
/// Entries in ascending date order; both bounds inclusive.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(client_id): Path<DbId>,
    Query(range): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<Vec<StatusEntry>>>> {
    auth.actor().ensure_client_access(client_id)?;
    let (start, end) =
        normalize_date_range(range.start_date.as_deref(), range.end_date.as_deref())?;

    if !ClientRepo::exists(&state.pool, client_id).await? {
        return Err(AppError::not_found("Client", client_id));
    }

    let entries = StatusEntryRepo::list_for_client(&state.pool, client_id, start, end).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/calendar/{client_id}/{date}
pub async fn get_day(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((client_id, date)): Path<(DbId, String)>,
) -> AppResult<Json<DataResponse<StatusEntry>>> {
    auth.actor().ensure_client_access(client_id)?;
    let entry_date = normalize_entry_date(&date)?;

    let entry = StatusEntryRepo::find_by_day(&state.pool, client_id, entry_date)
        .await?
        .ok_or_else(|| missing_day(client_id))?;
    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /api/v1/calendar/{client_id}/{date}
pub async fn delete_day(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((client_id, date)): Path<(DbId, String)>,
) -> AppResult<StatusCode> {
    let entry_date = normalize_entry_date(&date)?;

    if StatusEntryRepo::delete_by_day(&state.pool, client_id, entry_date).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(missing_day(client_id))
    }
}

fn missing_day(client_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Status entry for client",
        id: client_id,
    })
}

/// Raise the blocking notification for a freshly written `blocked` entry.
///
/// Best-effort: the entry is already committed, so a failure here is logged
/// and swallowed. At most one open notification exists per entry; repeated
/// blocked writes for the same day leave the open one in place.
async fn raise_blocker(state: &AppState, client: &Client, entry: &StatusEntry, raised_by: DbId) {
    let input = CreateNotification {
        client_id: client.id,
        status_entry_id: Some(entry.id),
        message: blocker_message(&client.name, entry),
        raised_by: Some(raised_by),
    };

    match NotificationRepo::raise_for_entry(&state.pool, &input).await {
        Ok(Some(notification)) => tracing::info!(
            notification_id = notification.id,
            entry_id = entry.id,
            client_id = client.id,
            "Blocker reported"
        ),
        Ok(None) => tracing::debug!(entry_id = entry.id, "Blocker already open for entry"),
        Err(e) => tracing::warn!(
            entry_id = entry.id,
            client_id = client.id,
            error = %e,
            "Failed to raise blocking notification"
        ),
    }
}

fn blocker_message(client_name: &str, entry: &StatusEntry) -> String {
    let mut message = format!("{client_name} reported a blocker for {}", entry.entry_date);
    if !entry.details.is_empty() {
        message.push_str(": ");
        message.push_str(&entry.details);
    }
    if message.chars().count() > MAX_NOTE_LENGTH {
        message = message.chars().take(MAX_NOTE_LENGTH).collect();
    }
    message
}
