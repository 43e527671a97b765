use std::sync::Arc;

use dashmap::DashMap;

/// Registry of live connections and the verified player behind each one.
///
/// The player id is bound when the connection attaches and never changes for
/// that connection's lifetime. Thread-safe; clone shares the inner map.
#[derive(Clone, Default)]
pub struct ConnectionsService {
    connections: Arc<DashMap<String, Option<String>>>,
}

impl ConnectionsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection. Re-registering an id overwrites the previous
    /// entry (last writer wins).
    pub fn add(&self, connection_id: &str, player_id: Option<&str>) {
        self.connections
            .insert(connection_id.to_string(), player_id.map(str::to_string));
    }

    /// Deregisters a connection. Removing an unknown id is a no-op.
    pub fn remove(&self, connection_id: &str) {
        self.connections.remove(connection_id);
    }

    pub fn get_player_id(&self, connection_id: &str) -> Option<String> {
        self.connections
            .get(connection_id)
            .and_then(|entry| entry.value().clone())
    }

    /// All connections currently bound to the given player, e.g. after a
    /// reconnect left more than one attachment alive.
    pub fn get_connections_by_player_id(&self, player_id: &str) -> Vec<String> {
        self.connections
            .iter()
            .filter(|entry| entry.value().as_deref() == Some(player_id))
            .map(|entry| entry.key().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get_player_id() {
        let connections = ConnectionsService::new();

        connections.add("conn-1", Some("player-1"));

        assert_eq!(
            connections.get_player_id("conn-1"),
            Some("player-1".to_string())
        );
    }

    #[test]
    fn test_anonymous_connection_has_no_player_id() {
        let connections = ConnectionsService::new();

        connections.add("conn-1", None);

        assert_eq!(connections.get_player_id("conn-1"), None);
    }

    #[test]
    fn test_unknown_connection_has_no_player_id() {
        let connections = ConnectionsService::new();

        assert_eq!(connections.get_player_id("missing"), None);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let connections = ConnectionsService::new();
        connections.add("conn-1", Some("player-1"));

        connections.remove("conn-1");
        connections.remove("conn-1");

        assert_eq!(connections.get_player_id("conn-1"), None);
    }

    #[test]
    fn test_re_add_overwrites_entry() {
        let connections = ConnectionsService::new();
        connections.add("conn-1", Some("player-1"));

        connections.add("conn-1", Some("player-2"));

        assert_eq!(
            connections.get_player_id("conn-1"),
            Some("player-2".to_string())
        );
    }

    #[test]
    fn test_get_connections_by_player_id() {
        let connections = ConnectionsService::new();
        connections.add("conn-1", Some("player-1"));
        connections.add("conn-2", Some("player-1"));
        connections.add("conn-3", Some("player-2"));
        connections.add("conn-4", None);

        let mut found = connections.get_connections_by_player_id("player-1");
        found.sort();

        assert_eq!(found, vec!["conn-1".to_string(), "conn-2".to_string()]);
    }

    #[test]
    fn test_concurrent_add_and_remove() {
        let connections = ConnectionsService::new();
        let mut handles = Vec::new();

        for i in 0..8 {
            let connections = connections.clone();
            handles.push(std::thread::spawn(move || {
                for j in 0..100 {
                    let id = format!("conn-{}-{}", i, j);
                    connections.add(&id, Some("player"));
                    connections.remove(&id);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(connections.get_connections_by_player_id("player").is_empty());
    }
}
