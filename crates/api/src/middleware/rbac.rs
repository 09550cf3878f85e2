//! Agency-staff gate.
//!
//! Tenant scoping is not decided here: handlers call
//! `Actor::ensure_client_access` once they know which client is targeted.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated caller holding `super_admin` or `admin`.
///
/// Client-role callers are turned away with 403 before the handler body
/// (and any request body parsing) runs.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if let Err(denied) = user.actor().ensure_admin() {
            tracing::debug!(
                user_id = user.user_id,
                role = %user.role,
                path = %parts.uri.path(),
                "Admin-only route refused"
            );
            return Err(denied.into());
        }
        Ok(RequireAdmin(user))
    }
}
