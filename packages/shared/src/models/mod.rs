pub mod game_session;
pub mod move_request;
