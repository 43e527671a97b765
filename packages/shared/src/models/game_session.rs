use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

/// One side of a session: the live connection it was created from plus the
/// verified player behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub connection_id: String,
    pub player_id: String,
}

impl Participant {
    pub fn new(connection_id: &str, player_id: &str) -> Self {
        Participant {
            connection_id: connection_id.to_string(),
            player_id: player_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub session_id: String,
    pub white: Participant,
    pub black: Participant,
    /// Serialized board state, opaque to everything except the rules engine.
    pub position: String,
    pub status: GameStatus,
    pub move_history: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl GameSession {
    pub fn new(white: Participant, black: Participant, starting_position: String) -> Self {
        GameSession {
            session_id: Uuid::new_v4().to_string(),
            white,
            black,
            position: starting_position,
            status: GameStatus::Ongoing,
            move_history: vec![],
            created_at: Utc::now(),
        }
    }

    /// Which color the given player holds in this session, if any.
    pub fn color_of(&self, player_id: &str) -> Option<Color> {
        if self.white.player_id == player_id {
            Some(Color::White)
        } else if self.black.player_id == player_id {
            Some(Color::Black)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::new(
            Participant::new("conn-1", "player-white"),
            Participant::new("conn-2", "player-black"),
            "start".to_string(),
        )
    }

    #[test]
    fn test_new_session_fields() {
        let session = session();

        assert!(!session.session_id.is_empty());
        assert_eq!(session.position, "start");
        assert_eq!(session.status, GameStatus::Ongoing);
        assert!(session.move_history.is_empty());

        let now = Utc::now();
        assert!((now - session.created_at).num_seconds() < 10);
    }

    #[test]
    fn test_session_id_uniqueness() {
        let a = session();
        let b = session();

        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn test_color_of_resolves_both_players() {
        let session = session();

        assert_eq!(session.color_of("player-white"), Some(Color::White));
        assert_eq!(session.color_of("player-black"), Some(Color::Black));
        assert_eq!(session.color_of("someone-else"), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!GameStatus::Ongoing.is_terminal());
        assert!(GameStatus::WhiteWins.is_terminal());
        assert!(GameStatus::BlackWins.is_terminal());
        assert!(GameStatus::Draw.is_terminal());
    }

    #[test]
    fn test_session_serialization_round_trip() {
        let session = session();

        let serialized = serde_json::to_string(&session).unwrap();
        assert!(serialized.contains("\"session_id\""));
        assert!(serialized.contains("\"position\""));

        let deserialized: GameSession = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.session_id, session.session_id);
        assert_eq!(deserialized.white, session.white);
        assert_eq!(deserialized.black, session.black);
    }
}
