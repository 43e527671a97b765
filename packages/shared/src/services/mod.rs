pub mod broadcast_service;
pub mod chess_rules;
pub mod connections_service;
pub mod errors;
pub mod game_session_service;
pub mod queue_service;
