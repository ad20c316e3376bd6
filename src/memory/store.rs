use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::session::Session;

pub const DEFAULT_SESSION_ID: &str = "default";

/// Process-wide registry of conversation sessions.
///
/// DashMap gives lock-free access across sessions; the per-session
/// `tokio::sync::Mutex` serializes racing requests on the *same* session
/// so a read-history-then-append sequence is atomic. Requests on
/// different sessions never contend.
pub struct SessionStore {
    sessions: DashMap<String, Arc<Mutex<Session>>>,
    max_messages: usize,
}

impl SessionStore {
    pub fn new(max_messages: usize) -> Self {
        info!("Initializing session store (bound: {} messages)", max_messages);
        Self {
            sessions: DashMap::new(),
            max_messages,
        }
    }

    /// Returns the session for `id`, creating an empty one on first use.
    pub fn get_or_create(&self, id: &str) -> Arc<Mutex<Session>> {
        self.sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!("Creating new session '{}'", id);
                Arc::new(Mutex::new(Session::new(id, self.max_messages)))
            })
            .clone()
    }

    /// Empties a session's history without removing the session itself.
    /// Clearing an unknown or already-empty session succeeds.
    pub async fn clear(&self, id: &str) {
        if let Some(entry) = self.sessions.get(id) {
            let session = entry.value().clone();
            drop(entry);
            session.lock().await.clear();
            info!("Cleared session '{}'", id);
        }
    }

    /// Current message count and the configured bound.
    pub async fn status(&self, id: &str) -> (usize, usize) {
        match self.sessions.get(id) {
            Some(entry) => {
                let session = entry.value().clone();
                drop(entry);
                let guard = session.lock().await;
                (guard.len(), guard.max_messages())
            }
            None => (0, self.max_messages),
        }
    }

    pub async fn recent_questions(&self, id: &str, n: usize) -> Vec<String> {
        match self.sessions.get(id) {
            Some(entry) => {
                let session = entry.value().clone();
                drop(entry);
                let guard = session.lock().await;
                guard.recent_questions(n)
            }
            None => Vec::new(),
        }
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::session::ChatMessage;

    #[tokio::test]
    async fn get_or_create_returns_same_session() {
        let store = SessionStore::new(10);
        let a = store.get_or_create("s1");
        a.lock().await.append(ChatMessage::user("hello"));

        let b = store.get_or_create("s1");
        assert_eq!(b.lock().await.len(), 1);
        assert_eq!(store.session_count(), 1);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::new(10);
        store
            .get_or_create("s1")
            .lock()
            .await
            .append(ChatMessage::user("q"));
        assert_eq!(store.status("s1").await, (1, 10));
        assert_eq!(store.status("s2").await, (0, 10));
    }

    #[tokio::test]
    async fn clear_twice_leaves_zero_messages_both_times() {
        let store = SessionStore::new(10);
        let session = store.get_or_create("s1");
        session.lock().await.append(ChatMessage::user("q1"));
        session.lock().await.append(ChatMessage::user("q2"));

        store.clear("s1").await;
        assert_eq!(store.status("s1").await.0, 0);
        store.clear("s1").await;
        assert_eq!(store.status("s1").await.0, 0);
    }

    #[tokio::test]
    async fn clearing_unknown_session_is_a_noop() {
        let store = SessionStore::new(5);
        store.clear("nope").await;
        assert_eq!(store.status("nope").await, (0, 5));
    }

    #[tokio::test]
    async fn concurrent_appends_on_same_session_lose_nothing() {
        let store = Arc::new(SessionStore::new(100));
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let session = store.get_or_create("racy");
                let mut guard = session.lock().await;
                guard.append(ChatMessage::user(format!("q{}", i)));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.status("racy").await.0, 20);
    }
}
