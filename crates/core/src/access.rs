//! Tenant access policy.
//!
//! Admin-tier callers may act on any client. Client-role callers are bound
//! to exactly one client and may only touch that client's data; when they
//! write a status entry the only value they may report is `blocked`.
//!
//! A tenant mismatch is always reported as [`CoreError::Forbidden`], never as
//! not-found, so callers can tell an authorization failure from a missing
//! resource.

use crate::error::CoreError;
use crate::roles::Role;
use crate::status_log::EntryStatus;
use crate::types::DbId;

/// The authenticated caller, as decoded from an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
    /// Bound client for client-role callers; `None` for admins.
    pub client_id: Option<DbId>,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin_tier()
    }

    /// Ensure the caller may read or write data owned by `client_id`.
    pub fn ensure_client_access(&self, client_id: DbId) -> Result<(), CoreError> {
        if self.is_admin() || self.client_id == Some(client_id) {
            return Ok(());
        }
        Err(CoreError::Forbidden(format!(
            "Not permitted to access client {client_id}"
        )))
    }

    /// Ensure the caller may write a status entry with `status` for `client_id`.
    pub fn ensure_status_write(
        &self,
        client_id: DbId,
        status: EntryStatus,
    ) -> Result<(), CoreError> {
        self.ensure_client_access(client_id)?;
        if self.is_admin() || status.is_blocked() {
            return Ok(());
        }
        Err(CoreError::Forbidden(format!(
            "Clients may only report status '{}'",
            EntryStatus::Blocked
        )))
    }

    /// Ensure the caller holds an admin-tier role.
    pub fn ensure_admin(&self) -> Result<(), CoreError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::Forbidden("Admin role required".into()))
        }
    }

    /// The client a scoped listing should be restricted to.
    ///
    /// Admins get whatever filter they asked for (possibly none). Client-role
    /// callers are always pinned to their own client; asking for another one
    /// is forbidden.
    pub fn scope_filter(&self, requested: Option<DbId>) -> Result<Option<DbId>, CoreError> {
        if self.is_admin() {
            return Ok(requested);
        }
        let own = self.client_id.ok_or_else(|| {
            CoreError::Forbidden("Client account is not bound to a client".into())
        })?;
        match requested {
            Some(id) if id != own => Err(CoreError::Forbidden(format!(
                "Not permitted to access client {id}"
            ))),
            _ => Ok(Some(own)),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn admin() -> Actor {
        Actor {
            user_id: 1,
            role: Role::Admin,
            client_id: None,
        }
    }

    fn client_user(client_id: DbId) -> Actor {
        Actor {
            user_id: 10,
            role: Role::Client,
            client_id: Some(client_id),
        }
    }

    #[test]
    fn admin_accesses_any_client() {
        assert!(admin().ensure_client_access(42).is_ok());
        let super_admin = Actor {
            role: Role::SuperAdmin,
            ..admin()
        };
        assert!(super_admin.ensure_client_access(7).is_ok());
    }

    #[test]
    fn client_accesses_only_own_client() {
        let actor = client_user(5);
        assert!(actor.ensure_client_access(5).is_ok());
        assert_matches!(actor.ensure_client_access(6), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn client_may_only_report_blocked() {
        let actor = client_user(5);
        assert!(actor.ensure_status_write(5, EntryStatus::Blocked).is_ok());
        assert_matches!(
            actor.ensure_status_write(5, EntryStatus::OnTrack),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            actor.ensure_status_write(5, EntryStatus::Delayed),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn client_writing_other_tenant_forbidden_even_when_blocked() {
        let actor = client_user(5);
        assert_matches!(
            actor.ensure_status_write(6, EntryStatus::Blocked),
            Err(CoreError::Forbidden(msg)) if msg.contains("client 6")
        );
    }

    #[test]
    fn admin_may_write_any_status() {
        for status in [EntryStatus::OnTrack, EntryStatus::Blocked, EntryStatus::Delayed] {
            assert!(admin().ensure_status_write(3, status).is_ok());
        }
    }

    #[test]
    fn ensure_admin_rejects_clients() {
        assert!(admin().ensure_admin().is_ok());
        assert_matches!(client_user(1).ensure_admin(), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn scope_filter_pins_clients_to_own_tenant() {
        let actor = client_user(5);
        assert_eq!(actor.scope_filter(None).unwrap(), Some(5));
        assert_eq!(actor.scope_filter(Some(5)).unwrap(), Some(5));
        assert_matches!(actor.scope_filter(Some(9)), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn scope_filter_passes_admin_filter_through() {
        assert_eq!(admin().scope_filter(None).unwrap(), None);
        assert_eq!(admin().scope_filter(Some(9)).unwrap(), Some(9));
    }

    #[test]
    fn unbound_client_is_forbidden() {
        let actor = Actor {
            user_id: 3,
            role: Role::Client,
            client_id: None,
        };
        assert_matches!(actor.scope_filter(None), Err(CoreError::Forbidden(_)));
        assert_matches!(actor.ensure_client_access(1), Err(CoreError::Forbidden(_)));
    }
}
