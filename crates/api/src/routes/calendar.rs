//! Route definitions for the `/calendar` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::calendar;
use crate::state::AppState;

/// Routes mounted at `/calendar`.
///
/// ```text
/// POST   /                       -> upsert (scoped + status policy)
/// GET    /{client_id}            -> list (?start_date=&end_date=)
/// GET    /{client_id}/{date}     -> get_day
/// DELETE /{client_id}/{date}     -> delete_day (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(calendar::upsert))
        .route("/{client_id}", get(calendar::list))
        .route(
            "/{client_id}/{date}",
            get(calendar::get_day).delete(calendar::delete_day),
        )
}
