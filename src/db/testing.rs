//! In-memory catalog fixtures for unit tests

use sqlx::sqlite::SqlitePoolOptions;

use super::{Database, connect_options};

const SCHEMA: &str = include_str!("../../tests/fixtures/schema.sql");
const SEED: &str = include_str!("../../tests/fixtures/seed.sql");
const UNICODE: &str = include_str!("../../tests/fixtures/unicode.sql");

/// Schema only. One connection with no idle expiry, since every connection
/// to `sqlite::memory:` opens a separate database.
pub async fn empty_database() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_options("sqlite::memory:").expect("memory url"))
        .await
        .expect("in-memory sqlite");

    sqlx::raw_sql(SCHEMA)
        .execute(&pool)
        .await
        .expect("apply schema");

    Database::new(pool)
}

/// Schema plus the six-book fixture catalog
pub async fn seeded_database() -> Database {
    let db = empty_database().await;

    sqlx::raw_sql(SEED)
        .execute(db.pool())
        .await
        .expect("apply seed");

    db
}

/// Seeded catalog plus books and authors with non-ASCII names
pub async fn unicode_database() -> Database {
    let db = seeded_database().await;

    sqlx::raw_sql(UNICODE)
        .execute(db.pool())
        .await
        .expect("apply unicode rows");

    db
}
