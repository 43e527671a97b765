use crate::repositories::errors::game_repository_errors::GameSessionRepositoryError;
use crate::services::errors::chess_rules_errors::ChessRulesError;

#[derive(Debug)]
pub enum GameSessionServiceError {
    SessionNotFound,
    /// The session already reached a terminal status; the move is ignored.
    SessionTerminal,
    /// The acting player is not one of the session's two participants.
    NotAParticipant,
    TurnViolation,
    /// Rejected by the rules engine. Expected under normal play.
    IllegalMove(String),
    InvalidPosition(String),
    RepositoryError(GameSessionRepositoryError),
}

impl std::fmt::Display for GameSessionServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameSessionServiceError::SessionNotFound => write!(f, "Game session not found"),
            GameSessionServiceError::SessionTerminal => write!(f, "Game session is already over"),
            GameSessionServiceError::NotAParticipant => {
                write!(f, "Player is not part of this game session")
            }
            GameSessionServiceError::TurnViolation => write!(f, "Not your turn"),
            GameSessionServiceError::IllegalMove(msg) => write!(f, "Illegal move: {}", msg),
            GameSessionServiceError::InvalidPosition(msg) => {
                write!(f, "Invalid position: {}", msg)
            }
            GameSessionServiceError::RepositoryError(err) => {
                write!(f, "Repository error: {}", err)
            }
        }
    }
}

impl std::error::Error for GameSessionServiceError {}

impl From<GameSessionRepositoryError> for GameSessionServiceError {
    fn from(err: GameSessionRepositoryError) -> Self {
        GameSessionServiceError::RepositoryError(err)
    }
}

impl From<ChessRulesError> for GameSessionServiceError {
    fn from(err: ChessRulesError) -> Self {
        match err {
            ChessRulesError::IllegalMove(msg) => GameSessionServiceError::IllegalMove(msg),
            ChessRulesError::InvalidPosition(msg) => GameSessionServiceError::InvalidPosition(msg),
        }
    }
}
