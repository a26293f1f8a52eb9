//! Greedy rule-chain strategy: win, block, then steer the opponent
//! toward safe sub-boards.

use super::{is_dangerous_destination, winning_cell};
use crate::engine::{Game, Player, Position};

/// Picks a cell in `target` for `player`.
///
/// Priority order: complete a line in the target; block the
/// opponent's immediate completion; among the remaining cells prefer
/// one whose index sends the opponent to a safe sub-board (center
/// first, then corners, then the first safe cell); otherwise fall
/// back to center, corners, edges.
pub(super) fn pick(game: &Game, target: Position, player: Player) -> Option<Position> {
    let board = game.board().get(target);

    if let Some(cell) = winning_cell(board, player) {
        return Some(cell);
    }
    if let Some(cell) = winning_cell(board, player.opponent()) {
        return Some(cell);
    }

    let safe: Vec<Position> = Position::ALL
        .into_iter()
        .filter(|&cell| board.is_empty(cell) && !is_dangerous_destination(game, cell, player))
        .collect();
    if !safe.is_empty() {
        if safe.contains(&Position::CENTER) {
            return Some(Position::CENTER);
        }
        if let Some(corner) = Position::CORNERS.into_iter().find(|c| safe.contains(c)) {
            return Some(corner);
        }
        return safe.first().copied();
    }

    if board.is_empty(Position::CENTER) {
        return Some(Position::CENTER);
    }
    for cell in Position::CORNERS {
        if board.is_empty(cell) {
            return Some(cell);
        }
    }
    for cell in Position::EDGES {
        if board.is_empty(cell) {
            return Some(cell);
        }
    }
    None
}
