use crate::error::Result;
use crate::storage::Storage;
use crate::types::Role;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

const KEY_ROLE: &str = "role";
const KEY_LAST_SYNC: &str = "last_sync";

/// Key-value session state: the logged-in role survives restarts so
/// staff do not re-enter the password every time the device wakes up.
pub struct SessionStore<'a> {
    storage: &'a Storage,
}

impl<'a> SessionStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn set_role(&self, role: Role) -> Result<()> {
        self.set(KEY_ROLE, role.as_str()).await
    }

    pub async fn role(&self) -> Result<Option<Role>> {
        Ok(self.get(KEY_ROLE).await?.and_then(|v| Role::parse(&v)))
    }

    pub async fn clear_role(&self) -> Result<()> {
        let conn = self.storage.get_connection().await;
        conn.execute("DELETE FROM session WHERE key = ?1", params![KEY_ROLE])?;
        Ok(())
    }

    pub async fn set_last_sync(&self, at: DateTime<Utc>) -> Result<()> {
        self.set(KEY_LAST_SYNC, &at.to_rfc3339()).await
    }

    pub async fn last_sync(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .get(KEY_LAST_SYNC)
            .await?
            .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.storage.get_connection().await;
        conn.execute(
            "INSERT OR REPLACE INTO session (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.storage.get_connection().await;
        let value = conn
            .query_row(
                "SELECT value FROM session WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn role_persists_and_clears() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(&dir.path().join("gala.db")).await.unwrap();
        let store = SessionStore::new(&storage);

        assert_eq!(store.role().await.unwrap(), None);

        store.set_role(Role::Admin).await.unwrap();
        assert_eq!(store.role().await.unwrap(), Some(Role::Admin));

        store.clear_role().await.unwrap();
        assert_eq!(store.role().await.unwrap(), None);
    }

    #[tokio::test]
    async fn last_sync_round_trip() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(&dir.path().join("gala.db")).await.unwrap();
        let store = SessionStore::new(&storage);

        let at = Utc::now();
        store.set_last_sync(at).await.unwrap();
        let loaded = store.last_sync().await.unwrap().unwrap();
        assert_eq!(loaded.timestamp(), at.timestamp());
    }
}
