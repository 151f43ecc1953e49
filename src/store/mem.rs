//! In-memory session store backed by DashMap.
//!
//! Sessions live as long as the process. Useful for tests and for servers
//! that do not need progress to survive a restart.

use dashmap::DashMap;

use crate::progress::SessionState;
use crate::topic::SessionId;

use super::{SessionRepository, StoreResult};

/// Concurrent in-memory session store using a sharded hashmap.
#[derive(Debug, Default)]
pub struct MemSessionStore {
    data: DashMap<SessionId, SessionState>,
}

impl MemSessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl SessionRepository for MemSessionStore {
    fn load(&self, id: &SessionId) -> StoreResult<Option<SessionState>> {
        Ok(self.data.get(id).map(|v| v.value().clone()))
    }

    fn save(&self, id: &SessionId, state: &SessionState) -> StoreResult<()> {
        self.data.insert(id.clone(), state.clone());
        Ok(())
    }
}
