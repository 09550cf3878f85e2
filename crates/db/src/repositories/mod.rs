//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod client_repo;
pub mod notification_repo;
pub mod role_repo;
pub mod status_entry_repo;
pub mod user_repo;
pub mod widget_repo;

pub use client_repo::ClientRepo;
pub use notification_repo::NotificationRepo;
pub use role_repo::RoleRepo;
pub use status_entry_repo::StatusEntryRepo;
pub use user_repo::UserRepo;
pub use widget_repo::WidgetRepo;
