//! Core domain types for ultimate tic-tac-toe.

use super::position::Position;
use serde::{Deserialize, Serialize};

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// A cell within a sub-board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell holding a player's mark.
    Marked(Player),
}

impl Cell {
    /// Returns the mark, if any.
    pub fn mark(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Marked(player) => Some(player),
        }
    }

    /// Checks if the cell is empty.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// One of the nine inner 3x3 boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubBoard {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
}

impl SubBoard {
    /// Creates a new empty sub-board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.index()]
    }

    /// Sets the cell at the given position.
    pub(crate) fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.index()] = cell;
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_empty()
    }

    /// Checks if every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Cells as optional marks, the shape line scanning works over.
    pub fn marks(&self) -> [Option<Player>; 9] {
        std::array::from_fn(|i| self.cells[i].mark())
    }
}

impl Default for SubBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// The 3x3 arrangement of sub-boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainBoard {
    boards: [SubBoard; 9],
}

impl MainBoard {
    /// Creates a new empty main board.
    pub fn new() -> Self {
        Self {
            boards: [SubBoard::new(); 9],
        }
    }

    /// Gets the sub-board at the given position.
    pub fn get(&self, board: Position) -> &SubBoard {
        &self.boards[board.index()]
    }

    /// Mutable access to a sub-board.
    pub(crate) fn get_mut(&mut self, board: Position) -> &mut SubBoard {
        &mut self.boards[board.index()]
    }

    /// Returns all sub-boards as a slice.
    pub fn boards(&self) -> &[SubBoard; 9] {
        &self.boards
    }

    /// Formats the full 9x9 grid as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for band in 0..3 {
            for row in 0..3 {
                for group in 0..3 {
                    let board = &self.boards[band * 3 + group];
                    for col in 0..3 {
                        let symbol = match board.cells[row * 3 + col] {
                            Cell::Empty => '.',
                            Cell::Marked(Player::X) => 'X',
                            Cell::Marked(Player::O) => 'O',
                        };
                        result.push(symbol);
                        if col < 2 {
                            result.push('|');
                        }
                    }
                    if group < 2 {
                        result.push_str("   ");
                    }
                }
                result.push('\n');
            }
            if band < 2 {
                result.push('\n');
            }
        }
        result
    }
}

impl Default for MainBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolved result of a single sub-board.
///
/// Always derived from the cells; any stored copy is a read
/// optimization that must be recomputed after every move into that
/// sub-board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubOutcome {
    /// Still open for play.
    Undecided,
    /// Won by a player.
    Won(Player),
    /// Full with no winner.
    Drawn,
}

impl SubOutcome {
    /// Checks whether the sub-board accepts no further moves.
    pub fn is_decided(self) -> bool {
        !matches!(self, SubOutcome::Undecided)
    }

    /// Returns the winner, if any.
    pub fn winner(self) -> Option<Player> {
        match self {
            SubOutcome::Won(player) => Some(player),
            _ => None,
        }
    }
}

/// Overall status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Drawn,
}

impl GameStatus {
    /// Checks whether the game is over.
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Returns the winner, if any.
    pub fn winner(self) -> Option<Player> {
        match self {
            GameStatus::Won(player) => Some(player),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Won(player) => write!(f, "won by {player}"),
            GameStatus::Drawn => write!(f, "drawn"),
        }
    }
}

/// The rule restricting which sub-board the next move must target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveConstraint {
    /// Any playable sub-board.
    Any,
    /// Exactly this sub-board.
    Board(Position),
}

impl ActiveConstraint {
    /// Returns the forced sub-board, if one is in force.
    pub fn board(self) -> Option<Position> {
        match self {
            ActiveConstraint::Any => None,
            ActiveConstraint::Board(board) => Some(board),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involution() {
        assert_eq!(Player::X.opponent(), Player::O);
        assert_eq!(Player::O.opponent().opponent(), Player::O);
    }

    #[test]
    fn test_sub_board_starts_empty() {
        let board = SubBoard::new();
        assert!(!board.is_full());
        for pos in Position::ALL {
            assert!(board.is_empty(pos));
        }
    }

    #[test]
    fn test_marks_mirror_cells() {
        let mut board = SubBoard::new();
        board.set(Position::Center, Cell::Marked(Player::X));
        let marks = board.marks();
        assert_eq!(marks[4], Some(Player::X));
        assert_eq!(marks.iter().filter(|m| m.is_some()).count(), 1);
    }

    #[test]
    fn test_display_shape() {
        let board = MainBoard::new();
        let text = board.display();
        // 9 cell rows plus 2 blank separator rows
        assert_eq!(text.lines().count(), 11);
    }
}
