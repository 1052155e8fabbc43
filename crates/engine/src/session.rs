// crates/engine/src/session.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use campus_buffering::HistoryBuffer;
use parking_lot::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Conversation state for one caller.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    caller_id: String,
    created_at: Instant,
    last_activity: Mutex<Instant>,
    history: HistoryBuffer,
}

impl Session {
    pub fn new(caller_id: impl Into<String>, max_history: usize) -> Self {
        let now = Instant::now();
        Self {
            id: Uuid::new_v4(),
            caller_id: caller_id.into(),
            created_at: now,
            last_activity: Mutex::new(now),
            history: HistoryBuffer::new(max_history),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn caller_id(&self) -> &str {
        &self.caller_id
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub fn touch(&self) {
        *self.last_activity.lock() = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.lock().elapsed()
    }
}

/// Caller id to session map; sessions are created on first contact.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    max_history: usize,
}

impl SessionRegistry {
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_history,
        }
    }

    /// Marks the session active under the registry lock, so a concurrent
    /// sweep cannot reap it between lookup and use.
    pub fn get_or_create(&self, caller_id: &str) -> Arc<Session> {
        if let Some(session) = self.sessions.read().get(caller_id) {
            session.touch();
            return session.clone();
        }

        let mut sessions = self.sessions.write();
        sessions
            .entry(caller_id.to_string())
            .or_insert_with(|| {
                debug!("Opening session for {}", caller_id);
                Arc::new(Session::new(caller_id, self.max_history))
            })
            .clone()
    }

    pub fn get(&self, caller_id: &str) -> Option<Arc<Session>> {
        self.sessions.read().get(caller_id).cloned()
    }

    /// Drops sessions idle for at least `max_idle` that no request is
    /// holding; returns how many went.
    pub fn cleanup_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| {
            Arc::strong_count(session) > 1 || session.idle_for() < max_idle
        });
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::ChatMessage;

    #[test]
    fn sessions_are_created_once_per_caller() {
        let registry = SessionRegistry::new(4);
        let a = registry.get_or_create("alice");
        let again = registry.get_or_create("alice");
        let b = registry.get_or_create("bob");

        assert_eq!(a.id(), again.id());
        assert_ne!(a.id(), b.id());
        assert_eq!(registry.len(), 2);
        assert_eq!(a.history().max_history(), 4);
    }

    #[test]
    fn histories_are_isolated() {
        let registry = SessionRegistry::new(4);
        registry
            .get_or_create("alice")
            .history()
            .append(ChatMessage::inbound("alice", "hello"));

        assert_eq!(registry.get("alice").unwrap().history().len(), 1);
        assert!(registry.get_or_create("bob").history().is_empty());
    }

    #[test]
    fn idle_sessions_are_reaped() {
        let registry = SessionRegistry::new(4);
        registry.get_or_create("alice");
        std::thread::sleep(Duration::from_millis(100));
        registry.get_or_create("bob").touch();

        assert_eq!(registry.cleanup_idle(Duration::from_millis(50)), 1);
        assert!(registry.get("alice").is_none());
        assert!(registry.get("bob").is_some());
        assert_eq!(registry.cleanup_idle(Duration::from_secs(60)), 0);
    }

    #[test]
    fn sessions_in_use_survive_a_sweep() {
        let registry = SessionRegistry::new(4);
        let held = registry.get_or_create("alice");
        std::thread::sleep(Duration::from_millis(100));

        assert_eq!(registry.cleanup_idle(Duration::from_millis(50)), 0);
        held.history().append(ChatMessage::outbound("still here"));
        assert_eq!(registry.get("alice").unwrap().history().len(), 1);

        drop(held);
        assert_eq!(registry.cleanup_idle(Duration::from_millis(50)), 1);
    }

    #[test]
    fn lookup_counts_as_activity() {
        let registry = SessionRegistry::new(4);
        registry.get_or_create("alice");
        std::thread::sleep(Duration::from_millis(100));
        registry.get_or_create("alice");

        assert_eq!(registry.cleanup_idle(Duration::from_millis(50)), 0);
    }
}
