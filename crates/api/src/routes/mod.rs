pub mod admin;
pub mod auth;
pub mod calendar;
pub mod clients;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/me                                         current user (requires auth)
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                get, update, deactivate
///
/// /clients                                         list (scoped), create (admin)
/// /clients/{id}                                    get (scoped), update, delete (admin)
///
/// /calendar                                        upsert status entry (scoped)
/// /calendar/{client_id}                            list entries (scoped)
/// /calendar/{client_id}/{date}                     get (scoped), delete (admin)
///
/// /dashboard/{client_id}                           layout (scoped)
/// /dashboard/{client_id}/layout                    replace (admin)
/// /dashboard/{client_id}/widgets                   append (admin)
/// /dashboard/{client_id}/widgets/{position}        delete (admin)
/// /dashboard/{client_id}/widgets/{position}/move   swap with neighbour (admin)
///
/// /notifications                                   list, raise (scoped)
/// /notifications/open-count                        open count (scoped)
/// /notifications/{id}/resolve                      resolve (admin)
///
/// /uploads/logo                                    upload client logo (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/clients", clients::router())
        .nest("/calendar", calendar::router())
        .nest("/dashboard", dashboard::router())
        .nest("/notifications", notifications::router())
        .nest("/uploads", uploads::router())
}
