//! Well-known role names and the admin/tenant tier split.
//!
//! These must match the seed data in `20260301000002_create_roles_and_users.sql`.

use serde::{Deserialize, Serialize};

pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CLIENT: &str = "client";

/// Seeded `roles.id` of the `client` role.
pub const CLIENT_ROLE_ID: i64 = 3;

/// A caller role as carried in access-token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Client,
}

impl Role {
    /// Parse a role name from the `roles` table. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ROLE_SUPER_ADMIN => Some(Self::SuperAdmin),
            ROLE_ADMIN => Some(Self::Admin),
            ROLE_CLIENT => Some(Self::Client),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => ROLE_SUPER_ADMIN,
            Self::Admin => ROLE_ADMIN,
            Self::Client => ROLE_CLIENT,
        }
    }

    /// Admin-tier roles may act on any tenant.
    pub fn is_admin_tier(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for role in [Role::SuperAdmin, Role::Admin, Role::Client] {
            assert_eq!(Role::from_name(role.as_str()), Some(role));
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(Role::from_name("creator"), None);
        assert_eq!(Role::from_name(""), None);
    }

    #[test]
    fn only_admins_are_admin_tier() {
        assert!(Role::SuperAdmin.is_admin_tier());
        assert!(Role::Admin.is_admin_tier());
        assert!(!Role::Client.is_admin_tier());
    }
}
