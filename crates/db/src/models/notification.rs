//! Blocking notification model and DTOs.

use helios_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `blocking_notifications` table.
///
/// Open while `is_resolved` is false. Resolution is terminal; resolving again
/// overwrites `resolved_by` / `resolved_at`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BlockingNotification {
    pub id: DbId,
    pub client_id: DbId,
    pub status_entry_id: Option<DbId>,
    pub message: String,
    pub raised_by: Option<DbId>,
    pub is_resolved: bool,
    pub resolved_by: Option<DbId>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for raising a notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub client_id: DbId,
    pub status_entry_id: Option<DbId>,
    pub message: String,
    pub raised_by: Option<DbId>,
}

/// Listing filter. `None` fields are not applied.
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    pub client_id: Option<DbId>,
    pub is_resolved: Option<bool>,
}
