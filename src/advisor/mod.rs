//! Move advisor: heuristic cell selection for the computer opponent.
//!
//! Given the current board and the forced-board constraint, the
//! advisor resolves a legal target sub-board and picks one empty cell
//! in it. Whenever any legal cell exists, a cell is returned; running
//! out of targets while the game is in progress is an invariant
//! violation, not a game event.

mod greedy;
mod scorer;

use crate::engine::{
    check_line_winner, ActiveConstraint, Cell, Game, Move, Player, Position, SubBoard,
};
use derive_more::{Display, Error};
use strum::IntoEnumIterator;
use tracing::{debug, error, instrument};

/// Cell-selection strategy for a computer seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// First empty cell of the target sub-board.
    First,
    /// Uniform random empty cell of the target sub-board.
    Random,
    /// Win/block/safe-destination rule chain.
    Greedy,
    /// Weighted priority scorer.
    #[default]
    Weighted,
}

/// Advisor failure: no playable sub-board.
///
/// Cannot occur while the game is in progress, since an undecided
/// sub-board always has an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum AdvisorError {
    /// Every sub-board is decided or full.
    #[display("No playable sub-board is available")]
    NoLegalTarget,
}

/// Picks a move for `player` under the current constraint.
///
/// The target is the forced sub-board when one is in force, otherwise
/// the first sub-board (in index order) that is undecided and has an
/// empty cell.
#[instrument(skip(game))]
pub fn choose_move(
    game: &Game,
    player: Player,
    strategy: Strategy,
) -> Result<Move, AdvisorError> {
    let target = match game.active_constraint() {
        ActiveConstraint::Board(board) => board,
        ActiveConstraint::Any => game.first_playable_board().ok_or_else(|| {
            error!("Advisor invoked with no playable sub-board");
            AdvisorError::NoLegalTarget
        })?,
    };

    let board = game.board().get(target);
    let cell = match strategy {
        Strategy::First => first_empty(board),
        Strategy::Random => random_empty(board),
        Strategy::Greedy => greedy::pick(game, target, player),
        Strategy::Weighted => scorer::pick(game, target, player),
    }
    .ok_or_else(|| {
        error!(board = %target, "Target sub-board has no empty cell");
        AdvisorError::NoLegalTarget
    })?;

    debug!(board = %target, cell = %cell, "Advisor chose a move");
    Ok(Move::new(target, cell, player))
}

/// First empty cell in index order.
fn first_empty(board: &SubBoard) -> Option<Position> {
    Position::iter().find(|&pos| board.is_empty(pos))
}

/// Uniform random empty cell.
fn random_empty(board: &SubBoard) -> Option<Position> {
    use rand::seq::SliceRandom;
    let open: Vec<Position> = Position::iter().filter(|&pos| board.is_empty(pos)).collect();
    open.choose(&mut rand::thread_rng()).copied()
}

/// True if placing `player` at `cell` completes a line on this board.
fn would_win(board: &SubBoard, cell: Position, player: Player) -> bool {
    let mut trial = *board;
    trial.set(cell, Cell::Marked(player));
    check_line_winner(&trial.marks()).map(|w| w.winner) == Some(player)
}

/// First cell that immediately wins the board for `player`.
fn winning_cell(board: &SubBoard, player: Player) -> Option<Position> {
    Position::ALL
        .into_iter()
        .find(|&pos| board.is_empty(pos) && would_win(board, pos, player))
}

/// Whether answering in sub-board `dest` would favor the opponent.
///
/// A destination is dangerous when it is already decided (the
/// constraint would relax to any board) or when the opponent can win
/// it in one move.
fn is_dangerous_destination(game: &Game, dest: Position, player: Player) -> bool {
    if game.sub_outcomes()[dest.index()].is_decided() {
        return true;
    }
    winning_cell(game.board().get(dest), player.opponent()).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_would_win_detects_completion() {
        let mut board = SubBoard::new();
        board.set(Position::TopLeft, Cell::Marked(Player::O));
        board.set(Position::TopCenter, Cell::Marked(Player::O));
        assert!(would_win(&board, Position::TopRight, Player::O));
        assert!(!would_win(&board, Position::TopRight, Player::X));
        assert!(!would_win(&board, Position::Center, Player::O));
    }

    #[test]
    fn test_winning_cell_prefers_lowest_index() {
        let mut board = SubBoard::new();
        // X holds the center column (1,4) and the middle row (3,4):
        // both 7 and 5 finish a line; 5 comes first in index order.
        board.set(Position::TopCenter, Cell::Marked(Player::X));
        board.set(Position::Center, Cell::Marked(Player::X));
        board.set(Position::MiddleLeft, Cell::Marked(Player::X));
        assert_eq!(winning_cell(&board, Player::X), Some(Position::MiddleRight));
    }

    #[test]
    fn test_fresh_board_is_safe_destination() {
        let game = Game::new();
        for dest in Position::ALL {
            assert!(!is_dangerous_destination(&game, dest, Player::O));
        }
    }
}
