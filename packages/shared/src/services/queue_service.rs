use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

/// Outcome of an enqueue attempt. A pairing is formed and both entries
/// removed in the same atomic step that admitted the new entry, so no other
/// caller can observe (or consume) a half-formed pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnqueueOutcome {
    AlreadyQueued,
    Waiting { count: usize },
    Paired { first: String, second: String, count: usize },
}

#[derive(Default)]
struct QueueInner {
    /// Arrival order; pairing always consumes from the front.
    order: VecDeque<String>,
    /// Fast duplicate check mirror of `order`.
    members: HashSet<String>,
}

/// FIFO matchmaking queue. A connection id appears at most once; the pairing
/// released by `enqueue` always consumes the two longest-waiting entries.
#[derive(Clone, Default)]
pub struct QueueService {
    inner: Arc<Mutex<QueueInner>>,
}

impl QueueService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, connection_id: &str) -> EnqueueOutcome {
        let mut inner = self.inner.lock();
        if !inner.members.insert(connection_id.to_string()) {
            return EnqueueOutcome::AlreadyQueued;
        }
        inner.order.push_back(connection_id.to_string());
        debug!("Connection {} joined the queue", connection_id);

        if inner.order.len() >= 2 {
            let first = inner.order.pop_front().unwrap();
            let second = inner.order.pop_front().unwrap();
            inner.members.remove(&first);
            inner.members.remove(&second);
            EnqueueOutcome::Paired {
                first,
                second,
                count: inner.order.len(),
            }
        } else {
            EnqueueOutcome::Waiting {
                count: inner.order.len(),
            }
        }
    }

    /// Returns false if the connection was not queued.
    pub fn dequeue(&self, connection_id: &str) -> bool {
        let mut inner = self.inner.lock();
        if !inner.members.remove(connection_id) {
            return false;
        }
        inner.order.retain(|id| id != connection_id);
        debug!("Connection {} left the queue", connection_id);
        true
    }

    pub fn count(&self) -> usize {
        self.inner.lock().order.len()
    }

    /// The up-to-n longest-waiting entries, oldest first, without removing
    /// them.
    pub fn take_oldest(&self, n: usize) -> Vec<String> {
        self.inner.lock().order.iter().take(n).cloned().collect()
    }
}
