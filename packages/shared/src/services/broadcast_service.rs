use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Capacity of the send queue per connection.
const SEND_QUEUE_CAPACITY: usize = 64;

/// Best-effort event delivery to connections and per-session subscription
/// groups. Each registered connection gets a bounded queue; the transport
/// layer drains the matching receiver. Delivery is fire-and-forget: a full or
/// closed queue drops the event.
///
/// Thread-safe; clone shares the inner state.
pub struct BroadcastService<M> {
    inner: Arc<BroadcastInner<M>>,
}

impl<M> Clone for BroadcastService<M> {
    fn clone(&self) -> Self {
        BroadcastService {
            inner: self.inner.clone(),
        }
    }
}

struct BroadcastInner<M> {
    senders: DashMap<String, mpsc::Sender<M>>,
    /// session_id -> subscribed connection ids
    groups: DashMap<String, HashSet<String>>,
}

impl<M: Clone + Send + 'static> BroadcastService<M> {
    pub fn new() -> Self {
        BroadcastService {
            inner: Arc::new(BroadcastInner {
                senders: DashMap::new(),
                groups: DashMap::new(),
            }),
        }
    }

    /// Registers a connection and returns the receiving end of its queue.
    pub fn register(&self, connection_id: &str) -> mpsc::Receiver<M> {
        let (tx, rx) = mpsc::channel(SEND_QUEUE_CAPACITY);
        self.inner.senders.insert(connection_id.to_string(), tx);
        rx
    }

    /// Removes a connection and its membership in every group.
    pub fn deregister(&self, connection_id: &str) {
        self.inner.senders.remove(connection_id);
        self.inner.groups.iter_mut().for_each(|mut entry| {
            entry.value_mut().remove(connection_id);
        });
        self.inner.groups.retain(|_, members| !members.is_empty());
    }

    pub fn subscribe(&self, connection_id: &str, session_id: &str) {
        self.inner
            .groups
            .entry(session_id.to_string())
            .or_default()
            .insert(connection_id.to_string());
    }

    pub fn unsubscribe(&self, connection_id: &str, session_id: &str) {
        if let Some(mut members) = self.inner.groups.get_mut(session_id) {
            members.remove(connection_id);
        }
    }

    /// Returns true when the connection exists and the event was enqueued.
    pub fn send_to_connection(&self, connection_id: &str, event: M) -> bool {
        match self.inner.senders.get(connection_id) {
            Some(sender) => match sender.try_send(event) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("Send queue full for connection {}; event dropped", connection_id);
                    false
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("Send queue closed for connection {}", connection_id);
                    false
                }
            },
            None => {
                debug!("Connection {} is not registered; event dropped", connection_id);
                false
            }
        }
    }

    /// Delivers to every connection subscribed to the session. Returns the
    /// number of successful sends.
    pub fn send_to_group(&self, session_id: &str, event: M) -> usize {
        let members: Vec<String> = match self.inner.groups.get(session_id) {
            Some(members) => members.iter().cloned().collect(),
            None => return 0,
        };

        let mut sent = 0;
        for connection_id in &members {
            if self.send_to_connection(connection_id, event.clone()) {
                sent += 1;
            }
        }
        sent
    }

    pub fn send_to_all(&self, event: M) -> usize {
        let connection_ids: Vec<String> = self
            .inner
            .senders
            .iter()
            .map(|entry| entry.key().clone())
            .collect();

        let mut sent = 0;
        for connection_id in &connection_ids {
            if self.send_to_connection(connection_id, event.clone()) {
                sent += 1;
            }
        }
        sent
    }
}

impl<M: Clone + Send + 'static> Default for BroadcastService<M> {
    fn default() -> Self {
        Self::new()
    }
}
