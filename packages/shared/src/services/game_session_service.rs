use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::game_session::{Color, GameSession, GameStatus, Participant};
use crate::models::move_request::MoveRequest;
use crate::repositories::game_repository::GameSessionRepository;
use crate::services::chess_rules::{PositionOutcome, RulesEngine};
use crate::services::errors::game_session_service_errors::GameSessionServiceError;

/// Result of a successfully applied move.
#[derive(Debug, Clone)]
pub struct MoveApplied {
    pub session: GameSession,
    /// True when this move took the session out of `Ongoing`.
    pub status_changed: bool,
}

/// Owns active session state and is the sole writer of `position` and
/// `status`. Each session has its own mutex, so moves against one session are
/// strictly serialized while independent sessions proceed in parallel.
#[derive(Clone)]
pub struct GameSessionService {
    repository: Arc<dyn GameSessionRepository>,
    rules: Arc<dyn RulesEngine>,
    sessions: Arc<DashMap<String, Arc<Mutex<GameSession>>>>,
}

impl GameSessionService {
    pub fn new(repository: Arc<dyn GameSessionRepository>, rules: Arc<dyn RulesEngine>) -> Self {
        GameSessionService {
            repository,
            rules,
            sessions: Arc::new(DashMap::new()),
        }
    }

    pub async fn create_session(
        &self,
        white: Participant,
        black: Participant,
    ) -> Result<GameSession, GameSessionServiceError> {
        let session = GameSession::new(white, black, self.rules.starting_position());
        self.repository.create_game_session(&session).await?;
        self.sessions.insert(
            session.session_id.clone(),
            Arc::new(Mutex::new(session.clone())),
        );
        info!(
            "Created game session {} ({} vs {})",
            session.session_id, session.white.player_id, session.black.player_id
        );
        Ok(session)
    }

    pub async fn get_session(
        &self,
        session_id: &str,
    ) -> Result<Option<GameSession>, GameSessionServiceError> {
        match self.session_handle(session_id).await {
            Ok(handle) => Ok(Some(handle.lock().await.clone())),
            Err(GameSessionServiceError::SessionNotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn list_sessions(&self) -> Result<Vec<GameSession>, GameSessionServiceError> {
        self.repository
            .list_game_sessions()
            .await
            .map_err(GameSessionServiceError::from)
    }

    /// Validates and applies a move on behalf of `player_id`. The acting
    /// color and turn are resolved inside the session's critical section so a
    /// concurrent move cannot invalidate the check.
    pub async fn apply_move(
        &self,
        session_id: &str,
        player_id: &str,
        request: &MoveRequest,
    ) -> Result<MoveApplied, GameSessionServiceError> {
        let handle = self.session_handle(session_id).await?;
        let mut session = handle.lock().await;

        if session.status.is_terminal() {
            return Err(GameSessionServiceError::SessionTerminal);
        }
        let color = session
            .color_of(player_id)
            .ok_or(GameSessionServiceError::NotAParticipant)?;
        if self.rules.turn(&session.position)? != color {
            return Err(GameSessionServiceError::TurnViolation);
        }

        let new_position = self.rules.apply_move(&session.position, request)?;
        let new_status = match self.rules.outcome(&new_position)? {
            PositionOutcome::Ongoing => GameStatus::Ongoing,
            PositionOutcome::Won(Color::White) => GameStatus::WhiteWins,
            PositionOutcome::Won(Color::Black) => GameStatus::BlackWins,
            PositionOutcome::Drawn => GameStatus::Draw,
        };

        // Persist first; the in-memory session only changes once the
        // repository accepted the update, so a failed action leaves no
        // partial mutation behind.
        let mut updated = session.clone();
        updated.position = new_position;
        updated
            .move_history
            .push(format!("{} to {}", request.from_square, request.to_square));
        updated.status = new_status;
        self.repository.update_game_session(&updated).await?;

        let status_changed = updated.status != session.status;
        *session = updated.clone();

        Ok(MoveApplied {
            session: updated,
            status_changed,
        })
    }

    async fn session_handle(
        &self,
        session_id: &str,
    ) -> Result<Arc<Mutex<GameSession>>, GameSessionServiceError> {
        if let Some(entry) = self.sessions.get(session_id) {
            return Ok(entry.value().clone());
        }
        // Not indexed (e.g. created before a restart); rehydrate from the
        // repository under the entry lock so two callers get the same mutex.
        let session = self
            .repository
            .get_game_session(session_id)
            .await?
            .ok_or(GameSessionServiceError::SessionNotFound)?;
        let handle = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(session)))
            .value()
            .clone();
        Ok(handle)
    }
}
