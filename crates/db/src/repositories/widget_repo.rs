//! Repository for the `dashboard_widgets` table.
//!
//! A dashboard is persisted as a whole: every mutation rewrites the full
//! ordered list inside one transaction and bumps `clients.layout_version`.

use helios_core::types::DbId;
use helios_core::widget::WidgetSpec;
use sqlx::PgPool;

use crate::models::widget::{DashboardLayout, DashboardWidget, LayoutReplace};

/// Column list for `dashboard_widgets` queries.
const COLUMNS: &str = "id, client_id, widget_type, title, position, data, created_at, updated_at";

/// Provides layout read and replace operations.
pub struct WidgetRepo;

impl WidgetRepo {
    /// Load a client's widgets in display order together with the layout version.
    ///
    /// Both reads share one snapshot, so the version always describes the
    /// list returned with it even while a replacement commits in between.
    /// Returns `None` if the client does not exist.
    pub async fn get_layout(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Option<DashboardLayout>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let version: Option<i32> =
            sqlx::query_scalar("SELECT layout_version FROM clients WHERE id = $1")
                .bind(client_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(version) = version else {
            tx.rollback().await?;
            return Ok(None);
        };

        let query = format!(
            "SELECT {COLUMNS} FROM dashboard_widgets \
             WHERE client_id = $1 \
             ORDER BY position ASC"
        );
        let widgets = sqlx::query_as::<_, DashboardWidget>(&query)
            .bind(client_id)
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(DashboardLayout {
            client_id,
            version,
            widgets,
        }))
    }

    /// Replace a client's whole widget list.
    ///
    /// Positions are reassigned `0..n` from the slice order. When
    /// `expected_version` is given the replacement only happens if it still
    /// matches the stored token. The version bump takes a row lock on the
    /// client, so concurrent replacements for one client serialize.
    pub async fn replace_layout(
        pool: &PgPool,
        client_id: DbId,
        widgets: &[WidgetSpec],
        expected_version: Option<i32>,
    ) -> Result<LayoutReplace, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let version: Option<i32> = sqlx::query_scalar(
            "UPDATE clients SET layout_version = layout_version + 1 \
             WHERE id = $1 AND ($2::INT IS NULL OR layout_version = $2) \
             RETURNING layout_version",
        )
        .bind(client_id)
        .bind(expected_version)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(version) = version else {
            let current: Option<i32> =
                sqlx::query_scalar("SELECT layout_version FROM clients WHERE id = $1")
                    .bind(client_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;
            return Ok(match current {
                Some(current) => LayoutReplace::VersionMismatch { current },
                None => LayoutReplace::ClientNotFound,
            });
        };

        sqlx::query("DELETE FROM dashboard_widgets WHERE client_id = $1")
            .bind(client_id)
            .execute(&mut *tx)
            .await?;

        let insert_query = format!(
            "INSERT INTO dashboard_widgets (client_id, widget_type, title, position, data) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let mut stored = Vec::with_capacity(widgets.len());
        for (position, widget) in widgets.iter().enumerate() {
            let row = sqlx::query_as::<_, DashboardWidget>(&insert_query)
                .bind(client_id)
                .bind(&widget.widget_type)
                .bind(&widget.title)
                .bind(position as i32)
                .bind(&widget.data)
                .fetch_one(&mut *tx)
                .await?;
            stored.push(row);
        }

        tx.commit().await?;

        Ok(LayoutReplace::Replaced(DashboardLayout {
            client_id,
            version,
            widgets: stored,
        }))
    }
}
