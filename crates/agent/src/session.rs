//! In-memory session store

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use telassist_core::{SessionStore, Turn};

#[derive(Default)]
struct SessionEntry {
    turns: RwLock<Vec<Turn>>,
}

/// Default `SessionStore` backing: a per-user turn list in process
/// memory. Sessions appear lazily on first append and survive until
/// cleared; multi-process deployments would swap this for a keyed
/// external store behind the same trait.
///
/// Map entries are never evicted: `clear` empties a session's turns
/// but keeps its slot, so the map grows with distinct user ids. A
/// deployment with an unbounded id space needs the external store,
/// not this one.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: dashmap::DashMap<String, Arc<SessionEntry>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, user_id: &str) -> Arc<SessionEntry> {
        self.sessions
            .entry(user_id.to_string())
            .or_default()
            .clone()
    }

    /// Number of live sessions (cleared sessions keep their slot until
    /// the map entry is dropped, but hold no turns).
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn history(&self, user_id: &str) -> Vec<Turn> {
        match self.sessions.get(user_id) {
            Some(entry) => entry.turns.read().clone(),
            None => Vec::new(),
        }
    }

    async fn append(&self, user_id: &str, turn: Turn) {
        self.entry(user_id).turns.write().push(turn);
    }

    async fn clear(&self, user_id: &str) {
        if let Some(entry) = self.sessions.get(user_id) {
            entry.turns.write().clear();
        }
        tracing::debug!(user_id, "Session history cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lazy_creation_and_append() {
        let store = InMemorySessionStore::new();
        assert!(store.history("u1").await.is_empty());

        store.append("u1", Turn::user("bonjour")).await;
        store.append("u1", Turn::assistant("bonjour !")).await;
        assert_eq!(store.history("u1").await.len(), 2);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated_per_user() {
        let store = InMemorySessionStore::new();
        store.append("u1", Turn::user("a")).await;
        store.append("u2", Turn::user("b")).await;

        let h1 = store.history("u1").await;
        assert_eq!(h1.len(), 1);
        assert_eq!(h1[0].content, "a");
        assert_eq!(store.history("u2").await[0].content, "b");
    }

    #[tokio::test]
    async fn test_clear_empties_history() {
        let store = InMemorySessionStore::new();
        store.append("u1", Turn::user("a")).await;
        store.clear("u1").await;
        assert!(store.history("u1").await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_unknown_user_is_noop() {
        let store = InMemorySessionStore::new();
        store.clear("ghost").await;
        assert!(store.history("ghost").await.is_empty());
    }
}
