use std::path::Path;

use rusqlite::Connection;

use crate::{PrescriptionError, PrescriptionResult};

const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_initial.sql"))];

/// Open a SQLite connection to the given path and run migrations
pub fn open_database(path: &Path) -> PrescriptionResult<Connection> {
    let mut conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&mut conn)?;
    Ok(conn)
}

/// Open an in-memory database (for tests and one-shot CLI use)
pub fn open_memory_database() -> PrescriptionResult<Connection> {
    let mut conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&mut conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> PrescriptionResult<()> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Run all pending migrations, each in its own transaction
pub fn run_migrations(conn: &mut Connection) -> PrescriptionResult<()> {
    let current_version = current_version(conn);

    for &(version, sql) in MIGRATIONS {
        if version > current_version {
            tracing::info!("running migration v{version}");
            let tx = conn.transaction()?;
            tx.execute_batch(sql)
                .map_err(|e| PrescriptionError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                })?;
            tx.commit()?;
        }
    }

    Ok(())
}

/// Current schema version (0 if no schema exists yet)
pub fn current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get::<_, String>(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn memory_database_has_schema() {
        let conn = open_memory_database().unwrap();
        assert_eq!(
            table_names(&conn),
            vec!["medicines", "prescriptions", "presets", "schema_version"]
        );
        assert_eq!(current_version(&conn), 1);
    }

    #[test]
    fn reopening_file_database_does_not_rerun_migrations() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nuskha.db");

        {
            let conn = open_database(&path).unwrap();
            conn.execute(
                "INSERT INTO presets (id, name, medicines, created_at, updated_at)
                 VALUES ('p1', 'test', '[]', '2026-01-01', '2026-01-01')",
                [],
            )
            .unwrap();
        }

        let conn = open_database(&path).expect("second open should succeed");
        assert_eq!(current_version(&conn), 1);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM presets", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let conn = open_memory_database().unwrap();
        let result = conn.execute(
            "INSERT INTO medicines (id, prescription_id, position, name)
             VALUES ('m1', 'missing', 0, 'Paracetamol')",
            [],
        );
        assert!(result.is_err());
    }
}
