//! Game-rule engine: board state, move validation, outcome detection,
//! and the forced-board constraint.

mod action;
mod game;
mod position;
mod rules;
mod types;

pub use action::{Move, MoveError, MoveRecord};
pub use game::{Evaluation, Game, MoveReport};
pub use position::Position;
pub use rules::{check_line_winner, is_playable, overall_status, sub_outcome, LineWin, LINES};
pub use types::{ActiveConstraint, Cell, GameStatus, MainBoard, Player, SubBoard, SubOutcome};
