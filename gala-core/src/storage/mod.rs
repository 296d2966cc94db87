pub mod roster_store;
pub mod session_store;

pub use roster_store::RosterStore;
pub use session_store::SessionStore;

use crate::error::{GalaError, Result};
use rusqlite::Connection;
use std::path::Path;
use tokio::sync::Mutex;

/// Local SQLite database: session state plus a cached roster snapshot
/// so devices keep listing participants between syncs.
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub async fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| GalaError::internal(format!("Failed to create directory: {}", e)))?;
        }

        let conn = Connection::open(db_path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };

        storage.init_schema().await?;
        Ok(storage)
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().await;

        // Key-value session state (logged-in role, last sync time)
        conn.execute(
            "CREATE TABLE IF NOT EXISTS session (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        // Cached roster snapshot
        conn.execute(
            "CREATE TABLE IF NOT EXISTS participants (
                qr_code TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                surname TEXT NOT NULL,
                visited INTEGER NOT NULL DEFAULT 0,
                donation REAL NOT NULL DEFAULT 0
            )",
            [],
        )?;

        Ok(())
    }

    pub async fn get_connection(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}
