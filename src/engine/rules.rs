//! Win, draw, and playability rules.

use super::position::Position;
use super::types::{GameStatus, Player, SubBoard, SubOutcome};
use serde::{Deserialize, Serialize};

/// The eight winning line index-triples: rows, columns, diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// A completed three-in-a-row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWin {
    /// Player holding all three positions.
    pub winner: Player,
    /// The completed line.
    pub line: [Position; 3],
}

/// Scans the eight winning lines over nine marks.
///
/// Returns the first complete line together with its owner, or `None`
/// if no line is complete. The same scan evaluates a sub-board (over
/// raw cells) and the main board (over the array of sub-board
/// winners).
pub fn check_line_winner(marks: &[Option<Player>; 9]) -> Option<LineWin> {
    for line in LINES {
        let [a, b, c] = line;
        if let Some(player) = marks[a.index()] {
            if marks[b.index()] == Some(player) && marks[c.index()] == Some(player) {
                return Some(LineWin {
                    winner: player,
                    line,
                });
            }
        }
    }
    None
}

/// Derives a sub-board's outcome from its cells.
pub fn sub_outcome(board: &SubBoard) -> SubOutcome {
    if let Some(win) = check_line_winner(&board.marks()) {
        SubOutcome::Won(win.winner)
    } else if board.is_full() {
        SubOutcome::Drawn
    } else {
        SubOutcome::Undecided
    }
}

/// A sub-board accepts moves only while undecided and not full.
pub fn is_playable(outcome: SubOutcome, board: &SubBoard) -> bool {
    !outcome.is_decided() && !board.is_full()
}

/// Derives the overall status from the nine sub-board outcomes.
///
/// Sub-board winners act as marks; drawn and undecided sub-boards
/// count as empty. All sub-boards decided with no completed line is a
/// draw.
pub fn overall_status(outcomes: &[SubOutcome; 9]) -> (GameStatus, Option<LineWin>) {
    let winners: [Option<Player>; 9] = std::array::from_fn(|i| outcomes[i].winner());
    if let Some(win) = check_line_winner(&winners) {
        return (GameStatus::Won(win.winner), Some(win));
    }
    if outcomes.iter().all(|o| o.is_decided()) {
        return (GameStatus::Drawn, None);
    }
    (GameStatus::InProgress, None)
}
