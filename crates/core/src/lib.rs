//! Domain rules for the Helios client portal.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and `api`
//! crates call into these modules for validation and access decisions.

pub mod access;
pub mod client;
pub mod error;
pub mod logo;
pub mod roles;
pub mod status_log;
pub mod types;
pub mod widget;
