//! Repository for the `status_entries` table.

use chrono::NaiveDate;
use helios_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::status_entry::{StatusEntry, UpsertStatusEntry, UpsertedStatusEntry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, client_id, entry_date, status, details, notes, author_id, created_at, updated_at";

/// Provides the daily status upsert and reads over status entries.
pub struct StatusEntryRepo;

impl StatusEntryRepo {
    /// Insert or overwrite the entry for `(client_id, entry_date)`.
    ///
    /// A single `INSERT ... ON CONFLICT DO UPDATE` statement: two concurrent
    /// writers for the same client and day cannot both insert. `inserted` is
    /// derived from `xmax = 0`, which only holds for freshly inserted tuples.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertStatusEntry,
    ) -> Result<UpsertedStatusEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO status_entries (client_id, entry_date, status, details, notes, author_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT ON CONSTRAINT uq_status_entries_client_date DO UPDATE \
             SET status = EXCLUDED.status, \
                 details = EXCLUDED.details, \
                 notes = EXCLUDED.notes, \
                 author_id = EXCLUDED.author_id \
             RETURNING {COLUMNS}, (xmax = 0) AS inserted"
        );
        sqlx::query_as::<_, UpsertedStatusEntry>(&query)
            .bind(input.client_id)
            .bind(input.entry_date)
            .bind(input.status.as_str())
            .bind(&input.details)
            .bind(Json(&input.notes))
            .bind(input.author_id)
            .fetch_one(pool)
            .await
    }

    /// Find the entry for one client and day.
    pub async fn find_by_day(
        pool: &PgPool,
        client_id: DbId,
        entry_date: NaiveDate,
    ) -> Result<Option<StatusEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM status_entries WHERE client_id = $1 AND entry_date = $2"
        );
        sqlx::query_as::<_, StatusEntry>(&query)
            .bind(client_id)
            .bind(entry_date)
            .fetch_optional(pool)
            .await
    }

    /// List a client's entries in ascending date order.
    ///
    /// Both bounds are inclusive; `None` leaves that side open.
    pub async fn list_for_client(
        pool: &PgPool,
        client_id: DbId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<StatusEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM status_entries \
             WHERE client_id = $1 \
               AND ($2::DATE IS NULL OR entry_date >= $2) \
               AND ($3::DATE IS NULL OR entry_date <= $3) \
             ORDER BY entry_date ASC"
        );
        sqlx::query_as::<_, StatusEntry>(&query)
            .bind(client_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Count all entries a client has for a given day. Always 0 or 1.
    pub async fn count_for_day(
        pool: &PgPool,
        client_id: DbId,
        entry_date: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM status_entries WHERE client_id = $1 AND entry_date = $2",
        )
        .bind(client_id)
        .bind(entry_date)
        .fetch_one(pool)
        .await
    }

    /// Delete the entry for one client and day. Returns `true` if a row was removed.
    pub async fn delete_by_day(
        pool: &PgPool,
        client_id: DbId,
        entry_date: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM status_entries WHERE client_id = $1 AND entry_date = $2")
                .bind(client_id)
                .bind(entry_date)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
