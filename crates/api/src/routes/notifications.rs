//! Route definitions for the `/notifications` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET  /                 -> list (scoped, ?client_id=&resolved=&limit=&offset=)
/// POST /                 -> raise (scoped)
/// GET  /open-count       -> open_count (scoped)
/// PUT  /{id}/resolve     -> resolve (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list).post(notifications::raise))
        .route("/open-count", get(notifications::open_count))
        .route("/{id}/resolve", put(notifications::resolve))
}
