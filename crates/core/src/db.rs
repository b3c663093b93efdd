//! SQLite database handle and schema migration.
//!
//! The schema is applied from embedded SQL, versioned through the
//! `schema_version` table so reopening an existing database only runs the
//! migrations it is missing. Foreign keys are enforced at the connection
//! level.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::error::ServiceResult;

const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../migrations/001_initial.sql"))];

/// Shared database handle.
///
/// rusqlite connections are not `Sync`, so the connection sits behind a
/// mutex; services lock it for the duration of each operation. The
/// complaint-creation transaction relies on this exclusivity: its existence
/// checks and insert commit or fail together.
pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    /// Opens (creating if necessary) the database at `path` and applies any
    /// pending migrations.
    pub fn open(path: &Path) -> ServiceResult<Self> {
        let conn = Connection::open(path)?;
        configure_pragmas(&conn)?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a fresh in-memory database. Used by tests.
    pub fn open_in_memory() -> ServiceResult<Self> {
        let conn = Connection::open_in_memory()?;
        configure_pragmas(&conn)?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }
}

fn configure_pragmas(conn: &Connection) -> ServiceResult<()> {
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(())
}

fn run_migrations(conn: &Connection) -> ServiceResult<()> {
    let current = current_version(conn);
    for (version, sql) in MIGRATIONS {
        if *version > current {
            tracing::info!("applying schema migration v{version}");
            conn.execute_batch(sql)?;
        }
    }
    Ok(())
}

/// Current schema version, 0 when the schema does not exist yet.
fn current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_database_has_all_tables() {
        let db = Db::open_in_memory().unwrap();
        let conn = db.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        // schema_version + 5 entity tables
        assert_eq!(count, 6);
    }

    #[test]
    fn schema_version_is_current() {
        let db = Db::open_in_memory().unwrap();
        assert_eq!(current_version(&db.conn()), 1);
    }

    #[test]
    fn migrations_are_idempotent() {
        let db = Db::open_in_memory().unwrap();
        assert!(run_migrations(&db.conn()).is_ok());
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let db = Db::open_in_memory().unwrap();
        let conn = db.conn();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }
}
