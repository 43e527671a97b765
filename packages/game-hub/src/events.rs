use serde::{Deserialize, Serialize};
use shared::models::game_session::GameSession;

/// Outbound events, delivered through the broadcaster. The `event` tag is
/// what clients match on, e.g. `{"event": "sessionCreated", ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerEvent {
    QueueCountUpdated { count: usize },
    SessionCreated { session: GameSession },
    #[serde(rename_all = "camelCase")]
    PositionUpdated { session_id: String, position: String },
    SessionSnapshot { session: GameSession },
    #[serde(rename_all = "camelCase")]
    InvalidMove { session_id: String, from: String, to: String },
    SessionList { sessions: Vec<GameSession> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tag_serialization() {
        let event = ServerEvent::QueueCountUpdated { count: 3 };

        let serialized = serde_json::to_string(&event).unwrap();

        assert_eq!(serialized, r#"{"event":"queueCountUpdated","count":3}"#);
    }

    #[test]
    fn test_camel_case_field_names() {
        let event = ServerEvent::PositionUpdated {
            session_id: "s1".to_string(),
            position: "fen".to_string(),
        };

        let serialized = serde_json::to_string(&event).unwrap();

        assert!(serialized.contains("\"sessionId\""));
        assert!(serialized.contains("\"positionUpdated\""));
    }
}
