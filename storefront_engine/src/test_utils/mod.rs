//! Helpers for setting up test environments.

use log::*;

use crate::SqliteDatabase;

/// Loads `.env.test` (if present) and initialises logging. Safe to call from every test.
pub fn prepare_test_env() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
}

/// A fresh, fully migrated in-memory database.
///
/// The pool is capped at a single connection: each SQLite `:memory:` connection gets its own
/// database, so a larger pool would hand out empty databases.
pub async fn memory_db() -> SqliteDatabase {
    let db = SqliteDatabase::new_with_url("sqlite::memory:", 1)
        .await
        .expect("Error creating connection to in-memory database");
    db.run_migrations().await.expect("Error running DB migrations");
    db
}
