//! Relational persistence.
//!
//! Prescriptions, their medicine lines and presets live in a single SQLite database. The
//! connection is owned by [`Database`] and guarded by a mutex; every repository function takes
//! the connection explicitly so it can be exercised against an in-memory database in tests.

pub mod prescriptions;
pub mod presets;
pub mod sqlite;

use crate::{PrescriptionError, PrescriptionResult};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

/// Shared handle to the application database.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens (or creates) the database file and applies pending migrations.
    pub fn open(path: &Path) -> PrescriptionResult<Self> {
        tracing::info!("opening database at {}", path.display());
        Ok(Self {
            conn: Mutex::new(sqlite::open_database(path)?),
        })
    }

    /// Opens a fresh in-memory database with the full schema.
    pub fn open_in_memory() -> PrescriptionResult<Self> {
        Ok(Self {
            conn: Mutex::new(sqlite::open_memory_database()?),
        })
    }

    /// Runs `f` with exclusive access to the connection.
    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> PrescriptionResult<T>,
    ) -> PrescriptionResult<T> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| PrescriptionError::LockPoisoned)?;
        f(&mut guard)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}
