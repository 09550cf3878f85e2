//! Domain errors shared by every Helios crate.
//!
//! Each variant corresponds to one HTTP status in the API layer; the message
//! is what the caller sees, so it must not leak internals.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced row (client, status day, notification, widget) is absent.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// Input rejected before any write happened.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Duplicate key or a stale `layout_version`.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No caller identity, or one that did not check out.
    #[error("not authenticated: {0}")]
    Unauthorized(String),

    /// Known caller acting outside its role or tenant.
    #[error("not permitted: {0}")]
    Forbidden(String),

    #[error("internal: {0}")]
    Internal(String),
}
