//! Remote-snapshot schema and validated application.
//!
//! A snapshot is what travels through the external persistence and
//! replication layer: the raw cells plus the claims the remote side
//! makes about them (turn, constraint, winner, last move). Applying a
//! snapshot re-derives every claim from the cells and rejects the
//! snapshot on any mismatch, leaving local state untouched; the
//! alternative - blindly overwriting local state with remote data -
//! lets one malformed write corrupt both peers.

use crate::engine::{ActiveConstraint, Cell, Game, MainBoard, Player, Position};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Last applied move, as carried by the sync schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    /// Sub-board index (0-8).
    pub board: u8,
    /// Cell index (0-8).
    pub cell: u8,
    /// Player who made the move.
    pub player: Player,
}

/// Wire form of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// Cells of the nine sub-boards, row-major.
    pub board: [[Option<Player>; 9]; 9],
    /// Player to move.
    pub current_player: Player,
    /// Forced sub-board, if one is in force.
    pub active_board: Option<u8>,
    /// Overall winner claimed by the remote side.
    pub winner: Option<Player>,
    /// Most recent move.
    pub last_move: Option<LastMove>,
}

/// Why a snapshot was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SnapshotError {
    /// An index field is outside 0-8.
    #[display("Index {} is out of range", _0)]
    IndexOutOfRange(#[error(not(source))] u8),
    /// The claimed winner does not follow from the cells.
    #[display("Claimed winner does not match the board contents")]
    WinnerMismatch,
    /// The claimed active board does not follow from the last move.
    #[display("Claimed active board does not match the last move")]
    ConstraintMismatch,
    /// The last move's cell does not hold that player's mark.
    #[display("Claimed last move does not match the board contents")]
    LastMoveMismatch,
}

fn position(index: u8) -> Result<Position, SnapshotError> {
    Position::from_index(index as usize).ok_or(SnapshotError::IndexOutOfRange(index))
}

impl Game {
    /// Captures the wire form of the current state.
    pub fn snapshot(&self) -> GameSnapshot {
        let board: [[Option<Player>; 9]; 9] =
            std::array::from_fn(|b| self.board().get(Position::ALL[b]).marks());
        let last_move = self.history().last().map(|record| LastMove {
            board: record.mov.board.index() as u8,
            cell: record.mov.cell.index() as u8,
            player: record.mov.player,
        });
        GameSnapshot {
            board,
            current_player: self.to_move(),
            active_board: self
                .active_constraint()
                .board()
                .map(|pos| pos.index() as u8),
            winner: self.status().winner(),
            last_move,
        }
    }

    /// Replaces local state with a validated remote snapshot.
    ///
    /// Checks, in order: all index fields are in range, the last move
    /// points at a cell actually holding that player's mark, the
    /// claimed winner equals the winner re-derived from the cells, and
    /// the claimed active board equals the constraint derived from the
    /// last move (after relaxation). On rejection local state is
    /// untouched.
    ///
    /// History does not travel with a snapshot, so undo is unavailable
    /// after a remote apply.
    #[instrument(skip(self, snapshot))]
    pub fn apply_snapshot(&mut self, snapshot: &GameSnapshot) -> Result<(), SnapshotError> {
        let mut board = MainBoard::new();
        for (b, cells) in snapshot.board.iter().enumerate() {
            for (c, mark) in cells.iter().enumerate() {
                if let Some(player) = mark {
                    board
                        .get_mut(Position::ALL[b])
                        .set(Position::ALL[c], Cell::Marked(*player));
                }
            }
        }

        let last_cell = match snapshot.last_move {
            Some(last) => {
                let b = position(last.board)?;
                let c = position(last.cell)?;
                if board.get(b).get(c) != Cell::Marked(last.player) {
                    warn!(board = %b, cell = %c, "Rejecting snapshot: last move not on board");
                    return Err(SnapshotError::LastMoveMismatch);
                }
                Some(c)
            }
            None => None,
        };

        let candidate = Game::from_cells(board, snapshot.current_player, last_cell);

        if candidate.status().winner() != snapshot.winner {
            warn!(
                derived = ?candidate.status().winner(),
                claimed = ?snapshot.winner,
                "Rejecting snapshot: winner claim does not follow from cells"
            );
            return Err(SnapshotError::WinnerMismatch);
        }

        let claimed = match snapshot.active_board {
            Some(index) => ActiveConstraint::Board(position(index)?),
            None => ActiveConstraint::Any,
        };
        if candidate.active_constraint() != claimed {
            warn!(
                derived = ?candidate.active_constraint(),
                ?claimed,
                "Rejecting snapshot: active board claim does not follow from last move"
            );
            return Err(SnapshotError::ConstraintMismatch);
        }

        *self = candidate;
        Ok(())
    }
}
