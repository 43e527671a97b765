use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, MoveGen, Piece, Square};

use crate::models::game_session::Color;
use crate::models::move_request::MoveRequest;
use crate::services::errors::chess_rules_errors::ChessRulesError;

/// How the rules engine classifies a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionOutcome {
    Ongoing,
    Won(Color),
    Drawn,
}

/// The rules-engine collaborator: interprets serialized positions, validates
/// moves, and classifies outcomes. The session core treats positions as
/// opaque strings.
pub trait RulesEngine: Send + Sync {
    fn starting_position(&self) -> String;

    /// Applies the move to the position and returns the new serialized
    /// position, or rejects it with `IllegalMove`.
    fn apply_move(&self, position: &str, request: &MoveRequest) -> Result<String, ChessRulesError>;

    fn outcome(&self, position: &str) -> Result<PositionOutcome, ChessRulesError>;

    fn turn(&self, position: &str) -> Result<Color, ChessRulesError>;
}

/// Standard chess over FEN strings.
#[derive(Clone, Default)]
pub struct ChessRules;

impl ChessRules {
    pub fn new() -> Self {
        ChessRules
    }

    fn parse_board(position: &str) -> Result<Board, ChessRulesError> {
        Board::from_str(position)
            .map_err(|e| ChessRulesError::InvalidPosition(format!("Invalid FEN: {}", e)))
    }
}

impl RulesEngine for ChessRules {
    fn starting_position(&self) -> String {
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string()
    }

    fn apply_move(&self, position: &str, request: &MoveRequest) -> Result<String, ChessRulesError> {
        let board = Self::parse_board(position)?;

        let from_sq = Square::from_str(&request.from_square)
            .map_err(|_| ChessRulesError::IllegalMove("Invalid from square".to_string()))?;
        let to_sq = Square::from_str(&request.to_square)
            .map_err(|_| ChessRulesError::IllegalMove("Invalid to square".to_string()))?;

        let promotion = match &request.promotion_piece {
            Some(p) => match p.as_str() {
                "q" => Some(Piece::Queen),
                "r" => Some(Piece::Rook),
                "b" => Some(Piece::Bishop),
                "n" => Some(Piece::Knight),
                _ => {
                    return Err(ChessRulesError::IllegalMove(
                        "Invalid promotion piece".to_string(),
                    ))
                }
            },
            None => None,
        };

        let chess_move = ChessMove::new(from_sq, to_sq, promotion);

        let legal_moves: Vec<ChessMove> = MoveGen::new_legal(&board).collect();
        if !legal_moves.contains(&chess_move) {
            return Err(ChessRulesError::IllegalMove("Move is not legal".to_string()));
        }

        let mut new_board = board.clone();
        board.make_move(chess_move, &mut new_board);

        Ok(format!("{}", new_board))
    }

    fn outcome(&self, position: &str) -> Result<PositionOutcome, ChessRulesError> {
        let board = Self::parse_board(position)?;

        Ok(match board.status() {
            BoardStatus::Ongoing => PositionOutcome::Ongoing,
            BoardStatus::Stalemate => PositionOutcome::Drawn,
            // The side to move is checkmated, so the other side won
            BoardStatus::Checkmate => match board.side_to_move() {
                chess::Color::White => PositionOutcome::Won(Color::Black),
                chess::Color::Black => PositionOutcome::Won(Color::White),
            },
        })
    }

    fn turn(&self, position: &str) -> Result<Color, ChessRulesError> {
        let board = Self::parse_board(position)?;

        Ok(match board.side_to_move() {
            chess::Color::White => Color::White,
            chess::Color::Black => Color::Black,
        })
    }
}
