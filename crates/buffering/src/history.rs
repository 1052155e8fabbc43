// crates/buffering/src/history.rs

use std::collections::VecDeque;

use campus_core::ChatMessage;
use parking_lot::Mutex;
use tracing::debug;

use crate::DEFAULT_MAX_HISTORY;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryMetrics {
    pub total_appended: u64,
    pub evictions: u64,
    pub evicted_messages: u64,
}

#[derive(Debug)]
struct Inner {
    messages: VecDeque<ChatMessage>,
    metrics: HistoryMetrics,
}

/// Append-only message log that holds at most `2 * max_history` entries.
///
/// Once an append would go past that ceiling the oldest entries are dropped
/// in one batch, leaving the newest `max_history`.
#[derive(Debug)]
pub struct HistoryBuffer {
    max_history: usize,
    inner: Mutex<Inner>,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl HistoryBuffer {
    pub fn new(max_history: usize) -> Self {
        let max_history = max_history.max(1);
        Self {
            max_history,
            inner: Mutex::new(Inner {
                messages: VecDeque::with_capacity(max_history * 2),
                metrics: HistoryMetrics::default(),
            }),
        }
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn capacity(&self) -> usize {
        self.max_history * 2
    }

    pub fn append(&self, message: ChatMessage) {
        let mut inner = self.inner.lock();
        inner.messages.push_back(message);
        inner.metrics.total_appended += 1;

        if inner.messages.len() > self.capacity() {
            let excess = inner.messages.len() - self.max_history;
            inner.messages.drain(..excess);
            inner.metrics.evictions += 1;
            inner.metrics.evicted_messages += excess as u64;
            debug!("History evicted {} oldest messages", excess);
        }
    }

    /// Oldest first.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.inner.lock().messages.iter().cloned().collect()
    }

    pub fn last(&self) -> Option<ChatMessage> {
        self.inner.lock().messages.back().cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().messages.is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().messages.clear();
    }

    pub fn metrics(&self) -> HistoryMetrics {
        self.inner.lock().metrics
    }
}
