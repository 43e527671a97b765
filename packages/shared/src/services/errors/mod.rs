pub mod chess_rules_errors;
pub mod game_session_service_errors;
