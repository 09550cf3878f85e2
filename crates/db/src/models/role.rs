//! Seeded portal roles.

use helios_core::roles;
use helios_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A `roles` row. The table is seeded by migration and never written at runtime.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Role {
    /// The typed role, or `None` if the row holds a name this build does not know.
    pub fn kind(&self) -> Option<roles::Role> {
        roles::Role::from_name(&self.name)
    }
}
