use std::sync::Arc;

use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use shared::models::game_session::Participant;
use shared::models::move_request::MoveRequest;
use shared::repositories::game_repository::GameSessionRepository;
use shared::services::broadcast_service::BroadcastService;
use shared::services::chess_rules::RulesEngine;
use shared::services::connections_service::ConnectionsService;
use shared::services::errors::game_session_service_errors::GameSessionServiceError;
use shared::services::game_session_service::{GameSessionService, MoveApplied};
use shared::services::queue_service::{EnqueueOutcome, QueueService};

use crate::actions::ClientAction;
use crate::events::ServerEvent;

/// Entry point for all client actions. Sequences the registry, the queue,
/// the session service, and the broadcaster; this is the only place that
/// touches more than one of them in a single logical operation.
#[derive(Clone)]
pub struct GameHub {
    connections: ConnectionsService,
    queue: QueueService,
    sessions: GameSessionService,
    broadcaster: BroadcastService<ServerEvent>,
}

impl GameHub {
    pub fn new(repository: Arc<dyn GameSessionRepository>, rules: Arc<dyn RulesEngine>) -> Self {
        GameHub {
            connections: ConnectionsService::new(),
            queue: QueueService::new(),
            sessions: GameSessionService::new(repository, rules),
            broadcaster: BroadcastService::new(),
        }
    }

    /// Invoked by the transport layer when a client attaches. The returned
    /// receiver carries every event addressed to this connection.
    pub fn on_connect(
        &self,
        connection_id: &str,
        player_id: Option<&str>,
    ) -> mpsc::Receiver<ServerEvent> {
        self.connections.add(connection_id, player_id);
        self.broadcaster.register(connection_id)
    }

    /// Invoked by the transport layer when a client detaches. Queue
    /// membership goes before the registry entry; an in-flight move for this
    /// connection still completes.
    pub fn on_disconnect(&self, connection_id: &str) {
        if self.queue.dequeue(connection_id) {
            self.broadcast_queue_count();
        }
        self.broadcaster.deregister(connection_id);
        self.connections.remove(connection_id);
    }

    pub async fn handle_action(&self, connection_id: &str, action: ClientAction) {
        match action {
            ClientAction::JoinQueue => self.join_queue(connection_id).await,
            ClientAction::LeaveQueue => self.leave_queue(connection_id),
            ClientAction::SubscribeToSession { session_id } => {
                self.subscribe_to_session(connection_id, &session_id).await
            }
            ClientAction::UnsubscribeFromSession { session_id } => {
                self.unsubscribe_from_session(connection_id, &session_id)
            }
            ClientAction::PlayMove {
                session_id,
                from,
                to,
                promotion,
            } => {
                let request = MoveRequest {
                    from_square: from,
                    to_square: to,
                    promotion_piece: promotion,
                };
                self.play_move(connection_id, &session_id, request).await
            }
            ClientAction::ListSessions => self.list_sessions(connection_id).await,
            ClientAction::GetQueueCount => self.get_queue_count(connection_id),
        }
    }

    pub async fn join_queue(&self, connection_id: &str) {
        if self.connections.get_player_id(connection_id).is_none() {
            debug!("Unidentified connection {} tried to join the queue", connection_id);
            return;
        }

        match self.queue.enqueue(connection_id) {
            EnqueueOutcome::AlreadyQueued => {}
            EnqueueOutcome::Waiting { count } => {
                self.broadcaster
                    .send_to_all(ServerEvent::QueueCountUpdated { count });
            }
            EnqueueOutcome::Paired { first, second, .. } => {
                self.handle_pairing(first, second).await;
                // Re-read the count: resolving the pairing may have put a
                // connection back into the queue.
                self.broadcast_queue_count();
            }
        }
    }

    pub fn leave_queue(&self, connection_id: &str) {
        if self.connections.get_player_id(connection_id).is_none() {
            return;
        }
        if self.queue.dequeue(connection_id) {
            self.broadcast_queue_count();
        }
    }

    pub async fn subscribe_to_session(&self, connection_id: &str, session_id: &str) {
        match self.sessions.get_session(session_id).await {
            Ok(Some(session)) => {
                self.broadcaster.subscribe(connection_id, session_id);
                self.broadcaster
                    .send_to_connection(connection_id, ServerEvent::SessionSnapshot { session });
            }
            Ok(None) => {
                debug!("Connection {} subscribed to unknown session {}", connection_id, session_id);
            }
            Err(e) => error!("Failed to load session {}: {}", session_id, e),
        }
    }

    pub fn unsubscribe_from_session(&self, connection_id: &str, session_id: &str) {
        self.broadcaster.unsubscribe(connection_id, session_id);
    }

    pub async fn play_move(&self, connection_id: &str, session_id: &str, request: MoveRequest) {
        let Some(player_id) = self.connections.get_player_id(connection_id) else {
            debug!("Unidentified connection {} tried to play a move", connection_id);
            return;
        };

        match self.sessions.apply_move(session_id, &player_id, &request).await {
            Ok(MoveApplied {
                session,
                status_changed: false,
            }) => {
                self.broadcaster.send_to_group(
                    session_id,
                    ServerEvent::PositionUpdated {
                        session_id: session.session_id.clone(),
                        position: session.position,
                    },
                );
            }
            Ok(MoveApplied {
                session,
                status_changed: true,
            }) => {
                self.broadcaster
                    .send_to_group(session_id, ServerEvent::SessionSnapshot { session });
            }
            Err(GameSessionServiceError::IllegalMove(_))
            | Err(GameSessionServiceError::TurnViolation) => {
                self.broadcaster.send_to_connection(
                    connection_id,
                    ServerEvent::InvalidMove {
                        session_id: session_id.to_string(),
                        from: request.from_square,
                        to: request.to_square,
                    },
                );
            }
            Err(GameSessionServiceError::SessionNotFound)
            | Err(GameSessionServiceError::SessionTerminal)
            | Err(GameSessionServiceError::NotAParticipant) => {
                debug!(
                    "Move by connection {} on session {} dropped",
                    connection_id, session_id
                );
            }
            Err(e) => error!("Failed to apply move on session {}: {}", session_id, e),
        }
    }

    pub async fn list_sessions(&self, connection_id: &str) {
        match self.sessions.list_sessions().await {
            Ok(sessions) => {
                self.broadcaster
                    .send_to_connection(connection_id, ServerEvent::SessionList { sessions });
            }
            Err(e) => error!("Failed to list sessions: {}", e),
        }
    }

    pub fn get_queue_count(&self, connection_id: &str) {
        self.broadcaster.send_to_connection(
            connection_id,
            ServerEvent::QueueCountUpdated {
                count: self.queue.count(),
            },
        );
    }

    fn broadcast_queue_count(&self) {
        self.broadcaster.send_to_all(ServerEvent::QueueCountUpdated {
            count: self.queue.count(),
        });
    }

    /// Creates the session for a formed pairing and notifies exactly the two
    /// paired connections. Colors are assigned uniformly at random,
    /// independent of arrival order.
    async fn handle_pairing(&self, first: String, second: String) {
        let mut pair = (first, second);
        loop {
            let (a, b) = pair;

            let (player_a, player_b) = (
                self.connections.get_player_id(&a),
                self.connections.get_player_id(&b),
            );
            // On a lookup miss, one side lost its identity between pairing
            // and lookup; the side that still resolves goes back to the
            // front of the line. The survivor comes from the matched
            // pattern, never from a second registry read.
            let (player_a, player_b) = match (player_a, player_b) {
                (Some(pa), Some(pb)) => (pa, pb),
                (Some(_), None) => {
                    warn!("Dropping pairing with unidentified connection; re-enqueueing {}", a);
                    match self.queue.enqueue(&a) {
                        EnqueueOutcome::Paired { first, second, .. } => {
                            pair = (first, second);
                            continue;
                        }
                        _ => return,
                    }
                }
                (None, Some(_)) => {
                    warn!("Dropping pairing with unidentified connection; re-enqueueing {}", b);
                    match self.queue.enqueue(&b) {
                        EnqueueOutcome::Paired { first, second, .. } => {
                            pair = (first, second);
                            continue;
                        }
                        _ => return,
                    }
                }
                (None, None) => {
                    warn!("Dropping pairing; both connections unidentified");
                    return;
                }
            };

            let (white, black) = if rand::thread_rng().gen_bool(0.5) {
                (Participant::new(&a, &player_a), Participant::new(&b, &player_b))
            } else {
                (Participant::new(&b, &player_b), Participant::new(&a, &player_a))
            };

            match self.sessions.create_session(white, black).await {
                Ok(session) => {
                    // Players are subscribed up front so they receive every
                    // later event for their own session.
                    self.broadcaster
                        .subscribe(&session.white.connection_id, &session.session_id);
                    self.broadcaster
                        .subscribe(&session.black.connection_id, &session.session_id);
                    self.broadcaster.send_to_connection(
                        &session.white.connection_id,
                        ServerEvent::SessionCreated {
                            session: session.clone(),
                        },
                    );
                    self.broadcaster
                        .send_to_connection(&session.black.connection_id.clone(), ServerEvent::SessionCreated { session });
                }
                Err(e) => error!("Failed to create session for pairing: {}", e),
            }
            return;
        }
    }
}
