use super::{ResidentStore, StoreError};
use common::model::resident::{NormalizedResident, OwnerId, StoredResident};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS residents (
    id         TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL,
    empl_id    TEXT NOT NULL,
    name       TEXT NOT NULL,
    email      TEXT,
    room       TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    UNIQUE (user_id, empl_id)
);
CREATE INDEX IF NOT EXISTS residents_user_id ON residents (user_id);
";

const UPSERT: &str = "
INSERT INTO residents (id, user_id, empl_id, name, email, room)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
ON CONFLICT (user_id, empl_id) DO UPDATE SET
    name = excluded.name,
    email = excluded.email,
    room = excluded.room,
    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
RETURNING id, user_id, empl_id, name, email, room, created_at, updated_at
";

const LIST: &str = "
SELECT id, user_id, empl_id, name, email, room, created_at, updated_at
FROM residents
WHERE user_id = ?1
ORDER BY created_at, empl_id
";

/// Resident store backed by a SQLite database file.
///
/// A connection is opened per call, the same way the rest of the backend
/// talks to SQLite.
pub struct SqliteResidentStore {
    path: PathBuf,
}

impl SqliteResidentStore {
    /// Opens (or creates) the database at `path` and makes sure the schema
    /// exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.connect()?.execute_batch(SCHEMA)?;
        Ok(store)
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }
}

fn stored_resident(row: &Row<'_>) -> rusqlite::Result<StoredResident> {
    Ok(StoredResident {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        external_id: row.get(2)?,
        name: row.get(3)?,
        email: row.get(4)?,
        room: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl ResidentStore for SqliteResidentStore {
    fn upsert_residents(
        &self,
        residents: &[NormalizedResident],
    ) -> Result<Vec<StoredResident>, StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let mut persisted: Vec<StoredResident> = Vec::with_capacity(residents.len());
        {
            let mut stmt = tx.prepare(UPSERT)?;
            let mut index_by_key: HashMap<(String, String), usize> = HashMap::new();
            for resident in residents {
                let stored = stmt.query_row(
                    params![
                        Uuid::new_v4().to_string(),
                        resident.owner_id(),
                        resident.external_id(),
                        resident.name(),
                        resident.email(),
                        resident.room(),
                    ],
                    stored_resident,
                )?;
                let key = (stored.owner_id.clone(), stored.external_id.clone());
                match index_by_key.get(&key) {
                    Some(&i) => persisted[i] = stored,
                    None => {
                        index_by_key.insert(key, persisted.len());
                        persisted.push(stored);
                    }
                }
            }
        }
        // Dropping `tx` on an early return above rolls the whole batch back.
        tx.commit()?;
        debug!("upserted {} residents", persisted.len());
        Ok(persisted)
    }

    fn list_residents(&self, owner: &OwnerId) -> Result<Vec<StoredResident>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(LIST)?;
        let residents = stmt
            .query_map(params![owner.as_str()], stored_resident)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(residents)
    }
}
