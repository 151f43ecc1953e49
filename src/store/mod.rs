//! Session-state repositories.
//!
//! The engine never owns session storage; it loads and saves
//! [`SessionState`] through the [`SessionRepository`] trait:
//!
//! - [`MemSessionStore`]: concurrent hashmap (DashMap), process lifetime
//! - [`DurableSessionStore`]: ACID key-value store (redb)

pub mod durable;
pub mod mem;

use crate::error::StoreError;
use crate::progress::SessionState;
use crate::topic::SessionId;

pub use durable::DurableSessionStore;
pub use mem::MemSessionStore;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Minimal load/save contract for per-session state.
///
/// Implementations must be safe to call from many threads. The engine
/// serializes load-modify-save for a single session itself, so repositories
/// need no transactions spanning both calls.
pub trait SessionRepository: Send + Sync {
    /// Load a session, `Ok(None)` if it does not exist.
    fn load(&self, id: &SessionId) -> StoreResult<Option<SessionState>>;

    /// Insert or replace a session.
    fn save(&self, id: &SessionId, state: &SessionState) -> StoreResult<()>;
}

pub(crate) fn encode(state: &SessionState) -> StoreResult<Vec<u8>> {
    bincode::serialize(state).map_err(|e| StoreError::Serialization {
        message: format!("failed to serialize session state: {e}"),
    })
}

pub(crate) fn decode(bytes: &[u8]) -> StoreResult<SessionState> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization {
        message: format!("failed to deserialize session state: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_garbage_is_serialization_error() {
        let err = decode(&[0xff, 0x01]).unwrap_err();
        assert!(matches!(err, StoreError::Serialization { .. }));
    }

    #[test]
    fn repositories_are_object_safe() {
        let stores: Vec<Box<dyn SessionRepository>> = vec![Box::new(MemSessionStore::new())];
        let id = SessionId::from("u1");
        let state = SessionState::new("p", vec!["a".into()]).unwrap();
        for store in &stores {
            store.save(&id, &state).unwrap();
            assert_eq!(store.load(&id).unwrap(), Some(state.clone()));
        }
    }
}
