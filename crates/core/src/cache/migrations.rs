//! Versioned schema migrations for the cache database.
//!
//! Applied versions are recorded in `schema_versions`; each pending
//! migration runs in its own transaction together with its version row.

use tokio_rusqlite::{Connection, params};

use crate::Error;

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] =
    &[Migration { version: 1, name: "cache_entries", sql: include_str!("../../migrations/001_cache_entries.sql") }];

/// Apply every migration newer than the recorded schema version.
///
/// Returns the schema version after the run.
pub async fn run(conn: &Connection) -> Result<i64, Error> {
    conn.call(|conn| -> Result<i64, Error> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_versions (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL
            )",
        )?;

        let mut current: i64 =
            conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_versions", [], |row| row.get(0))?;

        for migration in MIGRATIONS.iter().filter(move |m| m.version > current) {
            let tx = conn.transaction()?;
            tx.execute_batch(migration.sql)
                .map_err(|e| Error::MigrationFailed(format!("{} ({}): {e}", migration.version, migration.name)))?;
            tx.execute(
                "INSERT INTO schema_versions (version, name, applied_at) VALUES (?1, ?2, ?3)",
                params![migration.version, migration.name, chrono::Utc::now().to_rfc3339()],
            )?;
            tx.commit()?;

            current = migration.version;
            tracing::info!(version = migration.version, name = migration.name, "applied cache migration");
        }

        Ok(current)
    })
    .await
    .map_err(Error::from)
}
