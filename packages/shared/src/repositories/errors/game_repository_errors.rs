#[derive(Debug)]
pub enum GameSessionRepositoryError {
    NotFound,
    Storage(String),
}

impl std::fmt::Display for GameSessionRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameSessionRepositoryError::NotFound => write!(f, "Game session not found"),
            GameSessionRepositoryError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for GameSessionRepositoryError {}
