//! Shared helpers for HTTP-level integration tests.
//!
//! Each test gets its own database from `#[sqlx::test]`; the helpers here
//! build the production router on top of it and issue one-shot requests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use helios_api::auth::jwt::{generate_access_token, JwtConfig};
use helios_api::auth::password::hash_password;
use helios_api::config::{ServerConfig, UploadConfig, DEFAULT_MAX_UPLOAD_BYTES};
use helios_api::router::build_app_router;
use helios_api::state::AppState;
use helios_api::storage::LocalLogoStore;
use helios_core::roles::{Role, CLIENT_ROLE_ID};
use helios_db::models::client::CreateClient;
use helios_db::models::user::{CreateUser, User};
use helios_db::repositories::{ClientRepo, UserRepo};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        db_max_connections: 5,
        jwt: test_jwt_config(),
        upload: UploadConfig {
            dir: upload_dir.to_path_buf(),
            public_base: "/uploads".to_string(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        },
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-long-enough".to_string(),
        expiry_hours: 24,
    }
}

/// Build the full application router (same middleware stack as production)
/// over the given pool. Uploaded logos go to a throwaway directory.
pub fn build_test_app(pool: PgPool) -> Router {
    let dir = std::env::temp_dir().join(format!("helios-test-{}", uuid::Uuid::new_v4()));
    build_test_app_with_uploads(pool, &dir)
}

/// Like [`build_test_app`] but with a caller-owned upload directory.
pub fn build_test_app_with_uploads(pool: PgPool, upload_dir: &Path) -> Router {
    let config = test_config(upload_dir);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        logo_store: Arc::new(LocalLogoStore::new(upload_dir, "/uploads")),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router is infallible")
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

/// Send a multipart body built by the caller.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    boundary: &str,
    body: Vec<u8>,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn token_for(user: &User, role: Role) -> String {
    generate_access_token(user.id, role, user.client_id, &test_jwt_config()).unwrap()
}

pub async fn create_user(
    pool: &PgPool,
    email: &str,
    role_id: i64,
    client_id: Option<i64>,
) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: email.split('@').next().unwrap_or(email).to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role_id,
            client_id,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Create an admin-role user and return it with a valid token.
pub async fn admin(pool: &PgPool) -> (User, String) {
    let user = create_user(pool, "admin@agency.test", 2, None).await;
    let token = token_for(&user, Role::Admin);
    (user, token)
}

/// Create a client-role user bound to `client_id` and return it with a token.
pub async fn client_user(pool: &PgPool, client_id: i64, email: &str) -> (User, String) {
    let user = create_user(pool, email, CLIENT_ROLE_ID, Some(client_id)).await;
    let token = token_for(&user, Role::Client);
    (user, token)
}

pub async fn create_client(pool: &PgPool, name: &str) -> i64 {
    ClientRepo::create(
        pool,
        &CreateClient {
            name: name.to_string(),
            primary_color: None,
            secondary_color: None,
            logo_url: None,
            status_id: None,
            account_manager_id: None,
        },
    )
    .await
    .expect("client creation should succeed")
    .id
}
