//! Status entry (daily work log) model and DTOs.

use chrono::NaiveDate;
use helios_core::status_log::{EntryStatus, StatusNote};
use helios_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `status_entries` table.
///
/// `entry_date` is the UTC calendar day the entry describes; there is at most
/// one row per `(client_id, entry_date)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusEntry {
    pub id: DbId,
    pub client_id: DbId,
    pub entry_date: NaiveDate,
    /// One of `on_track`, `blocked`, `delayed`.
    pub status: String,
    pub details: String,
    pub notes: Json<Vec<StatusNote>>,
    pub author_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StatusEntry {
    pub fn is_blocked(&self) -> bool {
        EntryStatus::parse(&self.status).is_ok_and(EntryStatus::is_blocked)
    }
}

/// Validated input for the `(client_id, entry_date)` upsert.
#[derive(Debug, Clone)]
pub struct UpsertStatusEntry {
    pub client_id: DbId,
    pub entry_date: NaiveDate,
    pub status: EntryStatus,
    pub details: String,
    pub notes: Vec<StatusNote>,
    pub author_id: DbId,
}

/// Result of an upsert: the persisted row and whether it was newly inserted.
#[derive(Debug, Clone, FromRow)]
pub struct UpsertedStatusEntry {
    #[sqlx(flatten)]
    pub entry: StatusEntry,
    pub inserted: bool,
}
