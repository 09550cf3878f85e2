//! Dashboard widget model and layout DTOs.

use helios_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `dashboard_widgets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DashboardWidget {
    pub id: DbId,
    pub client_id: DbId,
    pub widget_type: String,
    pub title: String,
    /// Zero-based, contiguous within a client.
    pub position: i32,
    pub data: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A client's full ordered widget list plus its concurrency token.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardLayout {
    pub client_id: DbId,
    pub version: i32,
    pub widgets: Vec<DashboardWidget>,
}

/// Outcome of a whole-list layout replacement.
#[derive(Debug, Clone)]
pub enum LayoutReplace {
    Replaced(DashboardLayout),
    /// `expected_version` did not match the stored token.
    VersionMismatch { current: i32 },
    ClientNotFound,
}
