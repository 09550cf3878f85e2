//! Integration tests for `/api/v1/uploads` and static logo serving.

mod common;

use axum::http::StatusCode;
use common::{
    admin, body_json, build_test_app_with_uploads, client_user, create_client, get,
    post_multipart_auth,
};
use helios_db::repositories::ClientRepo;
use http_body_util::BodyExt;
use sqlx::PgPool;

const BOUNDARY: &str = "helios-test-boundary";
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";

/// Build a multipart body with a `file` part and an optional `client_id` part.
fn multipart_body(filename: &str, data: &[u8], client_id: Option<i64>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(id) = client_id {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"client_id\"\r\n\r\n{id}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_sets_client_logo_and_is_served(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (_, token) = admin(&pool).await;
    let acme = create_client(&pool, "Acme").await;
    let app = build_test_app_with_uploads(pool.clone(), dir.path());

    let response = post_multipart_auth(
        app.clone(),
        "/api/v1/uploads/logo",
        BOUNDARY,
        multipart_body("Logo.PNG", PNG_BYTES, Some(acme)),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let url = json["data"]["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".png"));
    assert_eq!(json["data"]["client_id"], acme);

    let client = ClientRepo::find_by_id(&pool, acme).await.unwrap().unwrap();
    assert_eq!(client.logo_url.as_deref(), Some(url.as_str()));

    let served = get(app, &url).await;
    assert_eq!(served.status(), StatusCode::OK);
    let bytes = served.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], PNG_BYTES);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn same_bytes_reuse_the_same_file(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (_, token) = admin(&pool).await;
    let app = build_test_app_with_uploads(pool, dir.path());

    let mut urls = Vec::new();
    for _ in 0..2 {
        let response = post_multipart_auth(
            app.clone(),
            "/api/v1/uploads/logo",
            BOUNDARY,
            multipart_body("logo.png", PNG_BYTES, None),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        urls.push(body_json(response).await["data"]["url"].clone());
    }

    assert_eq!(urls[0], urls[1]);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bad_uploads_are_rejected(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (_, token) = admin(&pool).await;
    let app = build_test_app_with_uploads(pool, dir.path());

    let wrong_type = post_multipart_auth(
        app.clone(),
        "/api/v1/uploads/logo",
        BOUNDARY,
        multipart_body("logo.exe", PNG_BYTES, None),
        &token,
    )
    .await;
    assert_eq!(wrong_type.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(wrong_type).await["code"], "VALIDATION_ERROR");

    let empty = post_multipart_auth(
        app.clone(),
        "/api/v1/uploads/logo",
        BOUNDARY,
        multipart_body("logo.png", b"", None),
        &token,
    )
    .await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let unknown_client = post_multipart_auth(
        app,
        "/api/v1/uploads/logo",
        BOUNDARY,
        multipart_body("logo.png", PNG_BYTES, Some(999_999)),
        &token,
    )
    .await;
    assert_eq!(unknown_client.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_users_cannot_upload(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let acme = create_client(&pool, "Acme").await;
    let (_, token) = client_user(&pool, acme, "owner@acme.test").await;

    let response = post_multipart_auth(
        build_test_app_with_uploads(pool, dir.path()),
        "/api/v1/uploads/logo",
        BOUNDARY,
        multipart_body("logo.png", PNG_BYTES, Some(acme)),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}
