//! ACID-durable session store backed by redb.
//!
//! Each session is one row: session id → bincode-encoded [`SessionState`].
//! Every save is its own write transaction, reads use MVCC snapshots.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};

use crate::error::StoreError;
use crate::progress::SessionState;
use crate::topic::SessionId;

use super::{SessionRepository, StoreResult, decode, encode};

/// Table of sessions (session id → encoded state).
const SESSIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// File name of the database inside the data directory.
pub const DB_FILE: &str = "skillpath.redb";

/// Durable session store using redb.
pub struct DurableSessionStore {
    db: Arc<Database>,
}

impl DurableSessionStore {
    /// Open or create a durable store in the given directory.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(data_dir).map_err(|e| StoreError::Io { source: e })?;
        let db_path = data_dir.join(DB_FILE);
        let db = Database::create(&db_path).map_err(|e| StoreError::Redb {
            message: format!("failed to open redb at {}: {e}", db_path.display()),
        })?;

        // Create the table up front so read transactions never miss it.
        let txn = db.begin_write().map_err(redb_err("begin_write"))?;
        txn.open_table(SESSIONS_TABLE)
            .map_err(redb_err("open_table"))?;
        txn.commit().map_err(redb_err("commit"))?;

        tracing::debug!(path = %db_path.display(), "opened durable session store");
        Ok(Self { db: Arc::new(db) })
    }

    /// Ids of all stored sessions, sorted.
    pub fn session_ids(&self) -> StoreResult<Vec<SessionId>> {
        let txn = self.db.begin_read().map_err(redb_err("begin_read"))?;
        let table = txn
            .open_table(SESSIONS_TABLE)
            .map_err(redb_err("open_table"))?;
        let mut ids = Vec::new();
        for entry in table.iter().map_err(redb_err("iter"))? {
            let (key, _) = entry.map_err(redb_err("iter"))?;
            ids.push(SessionId::from(key.value()));
        }
        Ok(ids)
    }
}

impl SessionRepository for DurableSessionStore {
    fn load(&self, id: &SessionId) -> StoreResult<Option<SessionState>> {
        let txn = self.db.begin_read().map_err(redb_err("begin_read"))?;
        let table = txn
            .open_table(SESSIONS_TABLE)
            .map_err(redb_err("open_table"))?;
        let guard = table.get(id.as_str()).map_err(redb_err("get"))?;
        guard.map(|g| decode(g.value())).transpose()
    }

    fn save(&self, id: &SessionId, state: &SessionState) -> StoreResult<()> {
        let bytes = encode(state)?;
        let txn = self.db.begin_write().map_err(redb_err("begin_write"))?;
        {
            let mut table = txn
                .open_table(SESSIONS_TABLE)
                .map_err(redb_err("open_table"))?;
            table
                .insert(id.as_str(), bytes.as_slice())
                .map_err(redb_err("insert"))?;
        }
        txn.commit().map_err(redb_err("commit"))?;
        Ok(())
    }
}

fn redb_err<E: std::fmt::Display>(op: &'static str) -> impl Fn(E) -> StoreError {
    move |e| StoreError::Redb {
        message: format!("{op} failed: {e}"),
    }
}

impl std::fmt::Debug for DurableSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableSessionStore").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn state() -> SessionState {
        let mut s = SessionState::new(
            "devops_engineer",
            vec!["variables".into(), "git_basics".into()],
        )
        .unwrap();
        s.record_completion(&"variables".into(), 50);
        s
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = DurableSessionStore::open(dir.path()).unwrap();
        let id = SessionId::from("bob");

        assert_eq!(store.load(&id).unwrap(), None);
        store.save(&id, &state()).unwrap();
        assert_eq!(store.load(&id).unwrap(), Some(state()));
    }

    #[test]
    fn persistence_across_reopens() {
        let dir = TempDir::new().unwrap();
        let id = SessionId::from("carol");
        {
            let store = DurableSessionStore::open(dir.path()).unwrap();
            store.save(&id, &state()).unwrap();
        }
        let store = DurableSessionStore::open(dir.path()).unwrap();
        let loaded = store.load(&id).unwrap().unwrap();
        assert_eq!(loaded.reward_total, 50);
        assert!(loaded.is_completed("variables"));
    }

    #[test]
    fn session_ids_lists_saved_sessions() {
        let dir = TempDir::new().unwrap();
        let store = DurableSessionStore::open(dir.path()).unwrap();
        store.save(&"zed".into(), &state()).unwrap();
        store.save(&"amy".into(), &state()).unwrap();
        assert_eq!(
            store.session_ids().unwrap(),
            vec![SessionId::from("amy"), SessionId::from("zed")]
        );
    }
}
