//! Route definitions for the `/dashboard` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET    /{client_id}                             -> get_layout (scoped)
/// PUT    /{client_id}/layout                      -> replace_layout (admin)
/// POST   /{client_id}/widgets                     -> add_widget (admin)
/// POST   /{client_id}/widgets/{position}/move     -> move_widget (admin)
/// DELETE /{client_id}/widgets/{position}          -> delete_widget (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{client_id}", get(dashboard::get_layout))
        .route("/{client_id}/layout", put(dashboard::replace_layout))
        .route("/{client_id}/widgets", post(dashboard::add_widget))
        .route(
            "/{client_id}/widgets/{position}/move",
            post(dashboard::move_widget),
        )
        .route(
            "/{client_id}/widgets/{position}",
            delete(dashboard::delete_widget),
        )
}
