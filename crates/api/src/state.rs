use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::LogoStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: helios_db::DbPool,
    /// Server configuration (JWT settings, upload limits).
    pub config: Arc<ServerConfig>,
    /// Where uploaded client logos are written.
    pub logo_store: Arc<dyn LogoStore>,
}
