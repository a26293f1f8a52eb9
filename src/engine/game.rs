//! The game state machine: the single validated mutation path.

use super::action::{Move, MoveError, MoveRecord};
use super::position::Position;
use super::rules::{self, LineWin};
use super::types::{ActiveConstraint, Cell, GameStatus, MainBoard, Player, SubOutcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Derived state consumed by callers after each move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Outcome of each sub-board.
    pub sub_outcomes: [SubOutcome; 9],
    /// Overall game status.
    pub status: GameStatus,
    /// Effective constraint on the next move.
    pub constraint: ActiveConstraint,
}

/// Everything a caller needs after a successful move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    /// The move as recorded in the history.
    pub record: MoveRecord,
    /// Sub-board line completed by this move, for highlighting.
    pub sub_line: Option<LineWin>,
    /// Overall line completed by this move, for highlighting.
    pub overall_line: Option<LineWin>,
    /// Status after the move.
    pub status: GameStatus,
    /// Constraint binding the next move.
    pub constraint: ActiveConstraint,
}

/// Full game state.
///
/// Mutation happens only through [`Game::apply_move`], [`Game::undo`],
/// and [`Game::reset`]. Human, computer, and remote moves all funnel
/// through the same validated entry point. The outcome array is a
/// cache derived from the cells, recomputed after every mutation of a
/// sub-board; it never diverges from the cells it summarizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: MainBoard,
    outcomes: [SubOutcome; 9],
    status: GameStatus,
    overall_line: Option<LineWin>,
    /// Cell index of the most recent move; the raw source of the
    /// active constraint.
    last_cell: Option<Position>,
    to_move: Player,
    history: Vec<MoveRecord>,
}

impl Game {
    /// Creates an empty game with X to move.
    pub fn new() -> Self {
        Self {
            board: MainBoard::new(),
            outcomes: [SubOutcome::Undecided; 9],
            status: GameStatus::InProgress,
            overall_line: None,
            last_cell: None,
            to_move: Player::X,
            history: Vec::new(),
        }
    }

    /// Rebuilds a game from raw cells, deriving every cached field.
    ///
    /// Used by snapshot application; the caller cross-checks the
    /// snapshot's own claims against the derived result before
    /// trusting it. The rebuilt game carries no history.
    pub(crate) fn from_cells(
        board: MainBoard,
        to_move: Player,
        last_cell: Option<Position>,
    ) -> Self {
        let outcomes: [SubOutcome; 9] =
            std::array::from_fn(|i| rules::sub_outcome(board.get(Position::ALL[i])));
        let (status, overall_line) = rules::overall_status(&outcomes);
        Self {
            board,
            outcomes,
            status,
            overall_line,
            last_cell,
            to_move,
            history: Vec::new(),
        }
    }

    /// Returns the main board.
    pub fn board(&self) -> &MainBoard {
        &self.board
    }

    /// Returns the cached sub-board outcomes.
    pub fn sub_outcomes(&self) -> &[SubOutcome; 9] {
        &self.outcomes
    }

    /// Returns the overall status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the completed overall line, if the game is won.
    pub fn winning_line(&self) -> Option<LineWin> {
        self.overall_line
    }

    /// Returns the player whose turn it is.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns the move history.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// True if the sub-board is undecided and has an empty cell.
    pub fn is_playable(&self, board: Position) -> bool {
        rules::is_playable(self.outcomes[board.index()], self.board.get(board))
    }

    /// First playable sub-board in index order, if any.
    pub fn first_playable_board(&self) -> Option<Position> {
        Position::ALL.into_iter().find(|&b| self.is_playable(b))
    }

    /// Effective constraint on the next move.
    ///
    /// The raw value is the cell index of the last move; it relaxes to
    /// `Any` when that sub-board is decided or full. The relaxation is
    /// applied at read time, so a stale stored value can never lock
    /// the game.
    pub fn active_constraint(&self) -> ActiveConstraint {
        match self.last_cell {
            Some(cell) if self.is_playable(cell) => ActiveConstraint::Board(cell),
            _ => ActiveConstraint::Any,
        }
    }

    /// Derived state for callers; pure and idempotent.
    pub fn evaluate(&self) -> Evaluation {
        Evaluation {
            sub_outcomes: self.outcomes,
            status: self.status,
            constraint: self.active_constraint(),
        }
    }

    /// Applies a move after validating every precondition.
    ///
    /// Preconditions, checked in order: the game is still in progress,
    /// it is this player's turn, the target cell is empty, the target
    /// sub-board is undecided, and the move respects the effective
    /// constraint. On success the mark is written, the target
    /// sub-board's outcome and the overall status are recomputed from
    /// the cells, and the report carries any newly completed lines.
    ///
    /// # Errors
    ///
    /// A [`MoveError`] naming the first violated precondition.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveReport, MoveError> {
        if self.status.is_over() {
            return Err(MoveError::GameOver);
        }
        if mv.player != self.to_move {
            return Err(MoveError::WrongPlayer(mv.player));
        }
        if !self.board.get(mv.board).is_empty(mv.cell) {
            return Err(MoveError::CellOccupied {
                board: mv.board,
                cell: mv.cell,
            });
        }
        if self.outcomes[mv.board.index()].is_decided() {
            return Err(MoveError::BoardDecided(mv.board));
        }
        if let ActiveConstraint::Board(required) = self.active_constraint() {
            if mv.board != required {
                return Err(MoveError::OutsideActiveBoard { required });
            }
        }

        self.board
            .get_mut(mv.board)
            .set(mv.cell, Cell::Marked(mv.player));

        // The target was undecided before the write, so any complete
        // line on it now was finished by this move.
        let sub_line = rules::check_line_winner(&self.board.get(mv.board).marks());
        self.outcomes[mv.board.index()] = rules::sub_outcome(self.board.get(mv.board));

        let (status, overall_line) = rules::overall_status(&self.outcomes);
        self.status = status;
        self.overall_line = overall_line;

        let record = MoveRecord {
            mov: mv,
            seq: self.history.len() as u32,
        };
        self.history.push(record);
        self.last_cell = Some(mv.cell);
        self.to_move = mv.player.opponent();

        let report = MoveReport {
            record,
            sub_line,
            overall_line,
            status: self.status,
            constraint: self.active_constraint(),
        };
        debug!(seq = record.seq, status = %self.status, "Applied move");
        Ok(report)
    }

    /// Removes the last move, rebuilding the state by replaying the
    /// remaining history from an empty board.
    ///
    /// Replaying restores the exact pre-move state, including the
    /// active constraint and any sub-board outcome the undone move had
    /// decided. A no-op on empty history.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let mut moves = std::mem::take(&mut self.history);
        let undone = moves.pop()?;
        *self = Game::new();
        for record in moves {
            self.apply_move(record.mov)
                .expect("replayed history contains only legal moves");
        }
        debug!(seq = undone.seq, "Undid move");
        Some(undone)
    }

    /// Resets to a fresh game, clearing the move history.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!("Resetting game");
        *self = Game::new();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(index: usize) -> Position {
        Position::from_index(index).expect("index in range")
    }

    /// Applies scripted (board, cell) moves, alternating players.
    fn play(game: &mut Game, moves: &[(usize, usize)]) {
        for &(board, cell) in moves {
            let mv = Move::new(p(board), p(cell), game.to_move());
            game.apply_move(mv).expect("scripted move is legal");
        }
    }

    #[test]
    fn test_first_move_sets_constraint() {
        let mut game = Game::new();
        let report = game
            .apply_move(Move::new(p(4), p(4), Player::X))
            .expect("opening move is legal");
        assert_eq!(report.constraint, ActiveConstraint::Board(p(4)));
        assert_eq!(game.sub_outcomes()[4], SubOutcome::Undecided);
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_cell_never_overwritten() {
        let mut game = Game::new();
        play(&mut game, &[(4, 4)]);
        let err = game
            .apply_move(Move::new(p(4), p(4), Player::O))
            .unwrap_err();
        assert_eq!(
            err,
            MoveError::CellOccupied {
                board: p(4),
                cell: p(4)
            }
        );
    }

    #[test]
    fn test_constraint_enforced() {
        let mut game = Game::new();
        play(&mut game, &[(4, 4)]);
        let err = game
            .apply_move(Move::new(p(0), p(0), Player::O))
            .unwrap_err();
        assert_eq!(err, MoveError::OutsideActiveBoard { required: p(4) });
    }

    #[test]
    fn test_wrong_player_rejected() {
        let mut game = Game::new();
        let err = game
            .apply_move(Move::new(p(0), p(0), Player::O))
            .unwrap_err();
        assert_eq!(err, MoveError::WrongPlayer(Player::O));
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let mut game = Game::new();
        play(&mut game, &[(4, 4), (4, 0), (0, 4)]);
        assert_eq!(game.evaluate(), game.evaluate());
    }

    #[test]
    fn test_undo_round_trips_exactly() {
        let mut game = Game::new();
        play(&mut game, &[(4, 4), (4, 0), (0, 4)]);
        let before = game.clone();

        play(&mut game, &[(4, 8)]);
        assert_ne!(game, before);

        let undone = game.undo().expect("history is not empty");
        assert_eq!(undone.mov.cell, p(8));
        assert_eq!(game, before);
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let mut game = Game::new();
        assert_eq!(game.undo(), None);
        assert_eq!(game, Game::new());
    }

    #[test]
    fn test_undo_downgrades_won_sub_board() {
        let mut game = Game::new();
        // X takes cells 0,1,2 of sub-board 0 across legal turns.
        play(
            &mut game,
            &[(0, 2), (2, 0), (0, 1), (1, 0), (0, 0)],
        );
        assert_eq!(game.sub_outcomes()[0], SubOutcome::Won(Player::X));

        game.undo().expect("history is not empty");
        assert_eq!(game.sub_outcomes()[0], SubOutcome::Undecided);
        assert_eq!(game.active_constraint(), ActiveConstraint::Board(p(0)));
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut game = Game::new();
        play(&mut game, &[(4, 4), (4, 0)]);
        game.reset();
        assert_eq!(game, Game::new());
    }
}
