//! Credentials and tokens for portal accounts.

pub mod jwt;
pub mod password;
