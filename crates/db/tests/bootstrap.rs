use sqlx::PgPool;

/// Connect, migrate, and verify the seeded lookup tables.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    helios_db::health_check(&pool).await.unwrap();

    for table in ["roles", "client_statuses"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 3, "{table} should have three seed rows");
    }
}

/// Role IDs must line up with the constants in `helios_core::roles`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_role_seed_ids(pool: PgPool) {
    use helios_core::roles::{CLIENT_ROLE_ID, ROLE_ADMIN, ROLE_CLIENT, ROLE_SUPER_ADMIN};
    use helios_db::repositories::RoleRepo;

    assert_eq!(RoleRepo::resolve_name(&pool, 1).await.unwrap(), ROLE_SUPER_ADMIN);
    assert_eq!(RoleRepo::resolve_name(&pool, 2).await.unwrap(), ROLE_ADMIN);
    assert_eq!(
        RoleRepo::resolve_name(&pool, CLIENT_ROLE_ID).await.unwrap(),
        ROLE_CLIENT
    );
}
