#[derive(Debug)]
pub enum ChessRulesError {
    /// The move was rejected: bad square, bad promotion piece, or not legal
    /// in the current position. Expected under normal play.
    IllegalMove(String),
    /// The stored position could not be parsed. Not a user error.
    InvalidPosition(String),
}

impl std::fmt::Display for ChessRulesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChessRulesError::IllegalMove(msg) => write!(f, "Illegal move: {}", msg),
            ChessRulesError::InvalidPosition(msg) => write!(f, "Invalid position: {}", msg),
        }
    }
}

impl std::error::Error for ChessRulesError {}
