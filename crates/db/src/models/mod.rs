//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create/input DTO for inserts
//! - An update DTO (all `Option` fields) for patches where the entity supports them

pub mod client;
pub mod notification;
pub mod role;
pub mod status_entry;
pub mod user;
pub mod widget;
