use crate::error::Result;
use crate::storage::Storage;
use crate::types::Participant;
use rusqlite::params;

/// Cached roster snapshot. The remote service is authoritative; this
/// table only mirrors the last successful sync.
pub struct RosterStore<'a> {
    storage: &'a Storage,
}

impl<'a> RosterStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Replace the whole snapshot atomically.
    pub async fn replace_all(&self, roster: &[Participant]) -> Result<()> {
        let mut conn = self.storage.get_connection().await;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM participants", [])?;
        for p in roster {
            tx.execute(
                "INSERT INTO participants (qr_code, name, surname, visited, donation)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![p.qr_code, p.name, p.surname, p.visited as i64, p.donation],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    pub async fn load_all(&self) -> Result<Vec<Participant>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT qr_code, name, surname, visited, donation
             FROM participants ORDER BY surname, name",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Participant {
                qr_code: row.get(0)?,
                name: row.get(1)?,
                surname: row.get(2)?,
                visited: row.get::<_, i64>(3)? != 0,
                donation: row.get(4)?,
            })
        })?;

        let mut roster = Vec::new();
        for participant in rows {
            roster.push(participant?);
        }

        Ok(roster)
    }

    pub async fn count(&self) -> Result<usize> {
        let conn = self.storage.get_connection().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM participants", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
