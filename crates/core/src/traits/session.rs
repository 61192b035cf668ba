//! Session storage contract

use async_trait::async_trait;

use crate::conversation::Turn;

/// Per-user conversation history, keyed by an opaque user identifier.
///
/// Sessions are created lazily on first append and fully cleared when a
/// procedure completes. A session's turns are only ever touched through
/// the user id that owns it; implementations must not share turn state
/// across ids.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Snapshot of the session's turns, oldest first. Empty when the
    /// user has no session yet.
    async fn history(&self, user_id: &str) -> Vec<Turn>;

    /// Append a turn, creating the session if needed.
    async fn append(&self, user_id: &str, turn: Turn);

    /// Drop the session's entire turn history.
    async fn clear(&self, user_id: &str);
}
