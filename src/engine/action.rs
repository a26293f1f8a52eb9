//! Move types and rejection reasons.
//!
//! Moves are domain events: they can be validated, recorded, and
//! replayed independently of the state that applies them.

use super::position::Position;
use super::types::Player;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// A single move: a player marking one cell of one sub-board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Target sub-board.
    pub board: Position,
    /// Cell within the sub-board.
    pub cell: Position,
    /// Player making the move.
    pub player: Player,
}

impl Move {
    /// Creates a new move.
    pub fn new(board: Position, cell: Position, player: Player) -> Self {
        Self {
            board,
            cell,
            player,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> sub-board {}, cell {}",
            self.player, self.board, self.cell
        )
    }
}

/// An applied move, as kept in the history.
///
/// The history is append-only and owned by one playthrough; undo pops
/// the most recent record and a reset clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The move itself.
    pub mov: Move,
    /// Zero-based sequence number within the game.
    pub seq: u32,
}

/// Why a move was rejected.
///
/// Rejections are ordinary results, never panics; the caller decides
/// whether to surface them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The game already has a winner or ended in a draw.
    #[display("Game is already decided")]
    GameOver,
    /// It is the other player's turn.
    #[display("It is not {}'s turn", _0)]
    WrongPlayer(#[error(not(source))] Player),
    /// The target cell already holds a mark.
    #[display("Cell {} of sub-board {} is already occupied", cell, board)]
    CellOccupied {
        /// Target sub-board.
        board: Position,
        /// Occupied cell.
        cell: Position,
    },
    /// The target sub-board is already won or drawn.
    #[display("Sub-board {} is already decided", _0)]
    BoardDecided(#[error(not(source))] Position),
    /// Play is forced into a different sub-board.
    #[display("Play is forced into sub-board {}", required)]
    OutsideActiveBoard {
        /// The sub-board the constraint demands.
        required: Position,
    },
}
