//! Integration tests for the embedded migrations.
//!
//! These run against the shared PostgreSQL from `studyplan-test-utils`:
//! a testcontainers instance, or the server at `STUDYPLAN_TEST_PG_URL`.

use studyplan_db::pool;
use studyplan_test_utils::{create_test_db, drop_test_db};

#[tokio::test]
async fn migrations_create_every_table() {
    let (pool, db_name) = create_test_db().await;

    let counts = pool::table_counts(&pool).await.unwrap();
    let names: Vec<&str> = counts.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, pool::TABLES);
    assert!(counts.iter().all(|(_, count)| *count == 0));

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let (pool, db_name) = create_test_db().await;

    pool::run_migrations(&pool).await.unwrap();
    pool::run_migrations(&pool).await.unwrap();

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn minute_columns_reject_oversized_days() {
    let (pool, db_name) = create_test_db().await;

    let result = sqlx::query(
        "INSERT INTO daily_plans \
             (user_id, plan_date, daily_minutes, review_minutes, extras_minutes, \
              theory_minutes, items, trace) \
         VALUES (gen_random_uuid(), '2024-03-18', 1441, 0, 0, 0, '[]', '{}')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "CHECK constraint should reject 1441 minutes");

    pool.close().await;
    drop_test_db(&db_name).await;
}
