//! Repository for the `clients` table.

use helios_core::types::{DbId, StatusId};
use sqlx::PgPool;

use crate::models::client::{Client, CreateClient, UpdateClient};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, primary_color, secondary_color, logo_url, status_id, \
                       account_manager_id, layout_version, created_at, updated_at";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    ///
    /// If `status_id` is `None` in the input, defaults to 1 (Onboarding).
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (name, primary_color, secondary_color, logo_url, status_id, \
                                  account_manager_id)
             VALUES ($1, $2, $3, $4, COALESCE($5, 1), $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.primary_color)
            .bind(&input.secondary_color)
            .bind(&input.logo_url)
            .bind(input.status_id)
            .bind(input.account_manager_id)
            .fetch_one(pool)
            .await
    }

    /// Find a client by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a client exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List clients alphabetically, optionally restricted to one lifecycle status.
    pub async fn list(pool: &PgPool, status_id: Option<StatusId>) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients \
             WHERE ($1::SMALLINT IS NULL OR status_id = $1) \
             ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(status_id)
            .fetch_all(pool)
            .await
    }

    /// Apply the non-`None` fields of `input`.
    ///
    /// With `expected_status` set, the row is only written while its
    /// `status_id` still equals that value, so a lifecycle transition
    /// validated against a read cannot land on a status changed since.
    /// `None` means no row matched: the client is gone or the guard failed.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
        expected_status: Option<StatusId>,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = COALESCE($2, name),
                primary_color = COALESCE($3, primary_color),
                secondary_color = COALESCE($4, secondary_color),
                logo_url = COALESCE($5, logo_url),
                status_id = COALESCE($6, status_id),
                account_manager_id = COALESCE($7, account_manager_id)
             WHERE id = $1 AND ($8::SMALLINT IS NULL OR status_id = $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.primary_color)
            .bind(&input.secondary_color)
            .bind(&input.logo_url)
            .bind(input.status_id)
            .bind(input.account_manager_id)
            .bind(expected_status)
            .fetch_optional(pool)
            .await
    }

    /// Point a client's `logo_url` at a freshly stored logo.
    pub async fn set_logo_url(
        pool: &PgPool,
        id: DbId,
        logo_url: &str,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("UPDATE clients SET logo_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(logo_url)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a client. Returns `true` if a row was removed.
    ///
    /// Users, status entries, notifications and widgets owned by the client
    /// are removed with it by `ON DELETE CASCADE`.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
