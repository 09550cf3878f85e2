//! Integration tests for client lifecycle persistence.
//!
//! - Hard delete cascades to users, status entries, notifications and widgets
//! - Client-role users must be bound to a client
//! - Duplicate emails are rejected by `uq_users_email`

use chrono::NaiveDate;
use helios_core::roles::CLIENT_ROLE_ID;
use helios_core::status_log::EntryStatus;
use helios_core::widget::WidgetSpec;
use helios_db::models::client::{CreateClient, UpdateClient};
use helios_db::models::notification::CreateNotification;
use helios_db::models::status_entry::UpsertStatusEntry;
use helios_db::models::user::CreateUser;
use helios_db::repositories::{
    ClientRepo, NotificationRepo, StatusEntryRepo, UserRepo, WidgetRepo,
};
use serde_json::json;
use sqlx::PgPool;

fn new_client(name: &str) -> CreateClient {
    CreateClient {
        name: name.to_string(),
        primary_color: Some("#112233".to_string()),
        secondary_color: None,
        logo_url: None,
        status_id: None,
        account_manager_id: None,
    }
}

fn new_user(email: &str, role_id: i64, client_id: Option<i64>) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        name: "Someone".to_string(),
        password_hash: "not-a-real-hash".to_string(),
        role_id,
        client_id,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_new_client_defaults_to_onboarding(pool: PgPool) {
    let client = ClientRepo::create(&pool, &new_client("Acme")).await.unwrap();
    assert_eq!(client.status_id, 1);
    assert_eq!(client.layout_version, 0);

    let updated = ClientRepo::update(
        &pool,
        client.id,
        &UpdateClient {
            status_id: Some(2),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.status_id, 2);
    assert_eq!(updated.primary_color.as_deref(), Some("#112233"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_guard_rejects_changed_status(pool: PgPool) {
    let client = ClientRepo::create(&pool, &new_client("Acme")).await.unwrap();
    let archive = UpdateClient {
        status_id: Some(3),
        ..Default::default()
    };

    // The client is onboarding (1), so a write guarded on active (2) misses.
    let missed = ClientRepo::update(&pool, client.id, &archive, Some(2)).await.unwrap();
    assert!(missed.is_none());
    let unchanged = ClientRepo::find_by_id(&pool, client.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status_id, 1);

    let archived = ClientRepo::update(&pool, client.id, &archive, Some(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(archived.status_id, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hard_delete_cascades_to_owned_rows(pool: PgPool) {
    let client = ClientRepo::create(&pool, &new_client("Acme")).await.unwrap();
    let admin = UserRepo::create(&pool, &new_user("admin@agency.test", 2, None))
        .await
        .unwrap();
    let client_user = UserRepo::create(
        &pool,
        &new_user("owner@acme.test", CLIENT_ROLE_ID, Some(client.id)),
    )
    .await
    .unwrap();

    let entry = StatusEntryRepo::upsert(
        &pool,
        &UpsertStatusEntry {
            client_id: client.id,
            entry_date: NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
            status: EntryStatus::Blocked,
            details: "waiting on assets".to_string(),
            notes: vec![],
            author_id: client_user.id,
        },
    )
    .await
    .unwrap();
    NotificationRepo::create(
        &pool,
        &CreateNotification {
            client_id: client.id,
            status_entry_id: Some(entry.entry.id),
            message: "blocked".to_string(),
            raised_by: Some(client_user.id),
        },
    )
    .await
    .unwrap();
    WidgetRepo::replace_layout(
        &pool,
        client.id,
        &[WidgetSpec {
            widget_type: "metric".to_string(),
            title: "KPIs".to_string(),
            data: json!({"value": 3}),
        }],
        None,
    )
    .await
    .unwrap();

    assert!(ClientRepo::hard_delete(&pool, client.id).await.unwrap());

    assert!(ClientRepo::find_by_id(&pool, client.id).await.unwrap().is_none());
    assert!(UserRepo::find_by_id(&pool, client_user.id).await.unwrap().is_none());
    assert!(UserRepo::find_by_id(&pool, admin.id).await.unwrap().is_some());

    for table in ["status_entries", "blocking_notifications", "dashboard_widgets"] {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {table} WHERE client_id = $1"
        ))
        .bind(client.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 0, "{table} rows should cascade");
    }

    assert!(!ClientRepo::hard_delete(&pool, client.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_client_user_requires_binding(pool: PgPool) {
    let result = UserRepo::create(&pool, &new_user("loose@acme.test", CLIENT_ROLE_ID, None)).await;
    let err = result.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("ck_users_client_binding"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("dup@agency.test", 2, None))
        .await
        .unwrap();
    let err = UserRepo::create(&pool, &new_user("dup@agency.test", 2, None))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_logins_accumulate_and_reset(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("admin@agency.test", 2, None))
        .await
        .unwrap();

    let first = UserRepo::record_failed_login(&pool, user.id, 3, 15).await.unwrap();
    assert_eq!(first.failed_login_count, 1);
    assert!(first.locked_until.is_none());
    UserRepo::record_failed_login(&pool, user.id, 3, 15).await.unwrap();
    let third = UserRepo::record_failed_login(&pool, user.id, 3, 15).await.unwrap();
    assert_eq!(third.failed_login_count, 3);
    assert!(third.locked_until.is_some_and(|t| t > chrono::Utc::now()));

    UserRepo::record_successful_login(&pool, user.id).await.unwrap();
    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.failed_login_count, 0);
    assert!(reloaded.locked_until.is_none());
    assert!(reloaded.last_login_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_email_ignores_case(pool: PgPool) {
    UserRepo::create(&pool, &new_user("Admin@Agency.test", 2, None))
        .await
        .unwrap();
    let found = UserRepo::find_by_email(&pool, "admin@agency.TEST").await.unwrap();
    assert!(found.is_some());
}
