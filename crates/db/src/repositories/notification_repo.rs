//! Repository for the `blocking_notifications` table.

use helios_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{BlockingNotification, CreateNotification, NotificationFilter};

/// Column list for `blocking_notifications` queries.
const COLUMNS: &str = "id, client_id, status_entry_id, message, raised_by, is_resolved, \
                       resolved_by, resolved_at, created_at, updated_at";

/// Provides lifecycle operations for blocking notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Raise a notification, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateNotification,
    ) -> Result<BlockingNotification, sqlx::Error> {
        let query = format!(
            "INSERT INTO blocking_notifications (client_id, status_entry_id, message, raised_by) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockingNotification>(&query)
            .bind(input.client_id)
            .bind(input.status_entry_id)
            .bind(&input.message)
            .bind(input.raised_by)
            .fetch_one(pool)
            .await
    }

    /// Raise a notification for a status entry unless one is already open.
    ///
    /// Returns `None` when an open notification for the same entry exists
    /// (the partial unique index absorbs the insert).
    pub async fn raise_for_entry(
        pool: &PgPool,
        input: &CreateNotification,
    ) -> Result<Option<BlockingNotification>, sqlx::Error> {
        let query = format!(
            "INSERT INTO blocking_notifications (client_id, status_entry_id, message, raised_by) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (status_entry_id) WHERE is_resolved = FALSE DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockingNotification>(&query)
            .bind(input.client_id)
            .bind(input.status_entry_id)
            .bind(&input.message)
            .bind(input.raised_by)
            .fetch_optional(pool)
            .await
    }

    /// Find a notification by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BlockingNotification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blocking_notifications WHERE id = $1");
        sqlx::query_as::<_, BlockingNotification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List notifications newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &NotificationFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BlockingNotification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blocking_notifications \
             WHERE ($1::BIGINT IS NULL OR client_id = $1) \
               AND ($2::BOOLEAN IS NULL OR is_resolved = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, BlockingNotification>(&query)
            .bind(filter.client_id)
            .bind(filter.is_resolved)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a notification resolved by `resolver_id`.
    ///
    /// Not guarded on the current state: resolving an already resolved
    /// notification overwrites the resolver and timestamp. Returns `None`
    /// when no notification has the given ID.
    pub async fn resolve(
        pool: &PgPool,
        id: DbId,
        resolver_id: DbId,
    ) -> Result<Option<BlockingNotification>, sqlx::Error> {
        let query = format!(
            "UPDATE blocking_notifications \
             SET is_resolved = TRUE, resolved_by = $2, resolved_at = clock_timestamp() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockingNotification>(&query)
            .bind(id)
            .bind(resolver_id)
            .fetch_optional(pool)
            .await
    }

    /// Count open notifications, optionally for one client.
    pub async fn open_count(pool: &PgPool, client_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM blocking_notifications \
             WHERE is_resolved = FALSE AND ($1::BIGINT IS NULL OR client_id = $1)",
        )
        .bind(client_id)
        .fetch_one(pool)
        .await
    }
}
