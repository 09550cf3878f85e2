//! Request extractors that establish who is calling.
//!
//! [`auth::AuthUser`] decodes the bearer token; [`rbac::RequireAdmin`]
//! additionally demands agency staff.

pub mod auth;
pub mod rbac;
