//! Client (tenant) lifecycle and branding validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::types::StatusId;

/// Maximum length of a client's display name.
pub const MAX_CLIENT_NAME_LENGTH: usize = 200;

static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex")
});

/// Client lifecycle status.
///
/// Discriminants match the seed order of the `client_statuses` table.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStatus {
    Onboarding = 1,
    Active = 2,
    Archived = 3,
}

impl ClientStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    pub fn from_id(id: StatusId) -> Result<Self, CoreError> {
        match id {
            1 => Ok(Self::Onboarding),
            2 => Ok(Self::Active),
            3 => Ok(Self::Archived),
            other => Err(CoreError::Validation(format!(
                "Unknown client status id {other}"
            ))),
        }
    }

    /// Parse a lifecycle status by name, case-insensitively.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "onboarding" => Ok(Self::Onboarding),
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            _ => Err(CoreError::Validation(format!(
                "Unknown client status '{name}'. Must be one of: onboarding, active, archived"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl From<ClientStatus> for StatusId {
    fn from(value: ClientStatus) -> Self {
        value as StatusId
    }
}

/// Validate a lifecycle move.
///
/// Onboarding may go to Active or Archived, Active may be archived and an
/// archived client may be restored to Active. Nothing returns to Onboarding.
pub fn validate_status_transition(from: ClientStatus, to: ClientStatus) -> Result<(), CoreError> {
    use ClientStatus::*;

    let allowed = from == to
        || matches!(
            (from, to),
            (Onboarding, Active) | (Onboarding, Archived) | (Active, Archived) | (Archived, Active)
        );

    if allowed {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Client cannot move from '{}' to '{}'",
            from.name(),
            to.name()
        )))
    }
}

/// Validate a branding color (`#RGB` or `#RRGGBB`).
pub fn validate_hex_color(field: &str, value: &str) -> Result<(), CoreError> {
    if HEX_COLOR_RE.is_match(value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be a hex color like #1A2B3C, got '{value}'"
        )))
    }
}

/// Trim and validate a client display name.
pub fn normalize_client_name(name: &str) -> Result<String, CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Client name must not be empty".into()));
    }
    if name.chars().count() > MAX_CLIENT_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Client name must be at most {MAX_CLIENT_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}
