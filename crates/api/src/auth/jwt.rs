//! Portal access tokens.
//!
//! Tokens are HS256 JWTs issued by `helios`. Besides the usual registered
//! claims they carry the caller's [`Role`] and, for client-role accounts, the
//! client they are bound to, so tenant checks never need a database lookup.
//! There are no refresh tokens; a caller logs in again once the token expires.

use helios_core::access::Actor;
use helios_core::roles::Role;
use helios_core::types::DbId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `iss` claim written into and required on every token.
pub const TOKEN_ISSUER: &str = "helios";

/// Default access token lifetime in hours.
const DEFAULT_EXPIRY_HOURS: i64 = 24;

/// Claims carried by a Helios access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    pub role: Role,
    /// Present only for client-role users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<DbId>,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    /// The caller these claims describe, for tenant access decisions.
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.sub,
            role: self.role,
            client_id: self.client_id,
        }
    }
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_EXPIRY_HOURS`
    /// (default 24, must be positive).
    ///
    /// # Panics
    ///
    /// Panics on a missing secret or an unusable lifetime.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let expiry_hours: i64 = std::env::var("JWT_EXPIRY_HOURS")
            .ok()
            .map(|raw| raw.parse().expect("JWT_EXPIRY_HOURS must be an integer"))
            .unwrap_or(DEFAULT_EXPIRY_HOURS);
        assert!(expiry_hours > 0, "JWT_EXPIRY_HOURS must be positive");

        Self {
            secret,
            expiry_hours,
        }
    }

    /// Token lifetime in seconds, as reported to clients in `expires_in`.
    pub fn expires_in_secs(&self) -> i64 {
        self.expiry_hours * 3600
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        // `sub` is numeric, which jsonwebtoken's presence check does not
        // count; deserializing into `Claims` already requires it.
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation
    }
}

/// Issue an access token for a user.
pub fn generate_access_token(
    user_id: DbId,
    role: Role,
    client_id: Option<DbId>,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role,
        // Admin-tier tokens never carry a tenant.
        client_id: client_id.filter(|_| !role.is_admin_tier()),
        iss: TOKEN_ISSUER.to_string(),
        exp: now + config.expires_in_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Decode a token, checking signature, expiry and issuer.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &JwtConfig::validation(),
    )
    .map(|data| data.claims)
}
