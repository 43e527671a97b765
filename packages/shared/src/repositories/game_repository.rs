use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::models::game_session::GameSession;
use crate::repositories::errors::game_repository_errors::GameSessionRepositoryError;

/// Durable storage for game sessions, keyed by session id.
#[async_trait]
pub trait GameSessionRepository: Send + Sync {
    async fn create_game_session(
        &self,
        game_session: &GameSession,
    ) -> Result<(), GameSessionRepositoryError>;

    async fn get_game_session(
        &self,
        session_id: &str,
    ) -> Result<Option<GameSession>, GameSessionRepositoryError>;

    /// Fails with `NotFound` if the session was never created.
    async fn update_game_session(
        &self,
        game_session: &GameSession,
    ) -> Result<(), GameSessionRepositoryError>;

    async fn list_game_sessions(&self) -> Result<Vec<GameSession>, GameSessionRepositoryError>;
}

#[derive(Default)]
pub struct InMemoryGameSessionRepository {
    sessions: RwLock<HashMap<String, GameSession>>,
}

impl InMemoryGameSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameSessionRepository for InMemoryGameSessionRepository {
    async fn create_game_session(
        &self,
        game_session: &GameSession,
    ) -> Result<(), GameSessionRepositoryError> {
        self.sessions
            .write()
            .insert(game_session.session_id.clone(), game_session.clone());
        Ok(())
    }

    async fn get_game_session(
        &self,
        session_id: &str,
    ) -> Result<Option<GameSession>, GameSessionRepositoryError> {
        Ok(self.sessions.read().get(session_id).cloned())
    }

    async fn update_game_session(
        &self,
        game_session: &GameSession,
    ) -> Result<(), GameSessionRepositoryError> {
        let mut sessions = self.sessions.write();
        match sessions.get_mut(&game_session.session_id) {
            Some(existing) => {
                *existing = game_session.clone();
                Ok(())
            }
            None => Err(GameSessionRepositoryError::NotFound),
        }
    }

    async fn list_game_sessions(&self) -> Result<Vec<GameSession>, GameSessionRepositoryError> {
        let mut sessions: Vec<GameSession> = self.sessions.read().values().cloned().collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }
}
