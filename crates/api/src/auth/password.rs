//! Portal account passwords.
//!
//! Stored hashes are Argon2id PHC strings, so the salt and cost parameters
//! live in the `users.password_hash` column next to the digest.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use helios_core::error::CoreError;

/// Minimum password length for newly provisioned accounts.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(plain.as_bytes(), &salt)?
        .to_string())
}

/// Check `plain` against a stored hash.
///
/// A wrong password is `Ok(false)`. `Err` means the stored hash itself could
/// not be parsed, which the login handler reports as an internal error.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, password_hash::Error> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Enforce the account password policy for `email`'s new password.
///
/// Passwords must be at least [`MIN_PASSWORD_LENGTH`] characters and must not
/// contain the mailbox name of the account's email address.
pub fn check_password_policy(password: &str, email: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }

    let mailbox = email
        .split('@')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if mailbox.chars().count() >= 3 && password.to_lowercase().contains(&mailbox) {
        return Err(CoreError::Validation(
            "Password must not contain the account's email name".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn hash_round_trips_and_is_argon2id() {
        let hash = hash_password("agency-portal-secret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("agency-portal-secret", &hash).unwrap());
        assert!(!verify_password("agency-portal-guess", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("agency-portal-secret").unwrap();
        let b = hash_password("agency-portal-secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn corrupt_stored_hash_is_an_error() {
        assert!(verify_password("anything", "plaintext-in-db").is_err());
    }

    #[test]
    fn short_password_rejected() {
        assert_matches!(
            check_password_policy("short", "pat@acme.test"),
            Err(CoreError::Validation(msg)) if msg.contains("at least 12")
        );
        assert!(check_password_policy("twelve_chars", "pat@acme.test").is_ok());
    }

    #[test]
    fn password_containing_mailbox_rejected() {
        assert_matches!(
            check_password_policy("Jordan.Lee-2024!", "jordan.lee@acme.test"),
            Err(CoreError::Validation(_))
        );
        // Very short mailbox names are not matched.
        assert!(check_password_policy("al-is-a-long-pass", "al@acme.test").is_ok());
    }
}
