//! Ultimate tic-tac-toe: rule engine and heuristic computer opponent.
//!
//! A 3x3 grid of 3x3 sub-boards in which the cell played decides
//! which sub-board the opponent must answer in. This crate owns the
//! rules - move validation, sub-board and overall outcome detection,
//! the forced-board constraint, undo - plus a move advisor for the
//! computer seat and a thin session layer. Rendering, identity,
//! transport, and persistence belong to the caller; they interact with
//! the engine only through [`Game::apply_move`] and the session's move
//! funnel, and receive state through [`Game::evaluate`] and
//! [`sync::GameSnapshot`].
//!
//! # Example
//!
//! ```
//! use ultimate_ttt::{ActiveConstraint, Game, Move, Player, Position};
//!
//! let mut game = Game::new();
//! let report = game.apply_move(Move::new(Position::Center, Position::TopLeft, Player::X))?;
//! // The opponent is forced into the sub-board named by the cell.
//! assert_eq!(report.constraint, ActiveConstraint::Board(Position::TopLeft));
//! # Ok::<(), ultimate_ttt::MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod advisor;
pub mod engine;
pub mod session;
pub mod sync;

// Crate-level exports - engine
pub use engine::{
    ActiveConstraint, Cell, Evaluation, Game, GameStatus, LineWin, MainBoard, Move, MoveError,
    MoveRecord, MoveReport, Player, Position, SubBoard, SubOutcome,
};

// Crate-level exports - advisor
pub use advisor::{choose_move, AdvisorError, Strategy};

// Crate-level exports - session management
pub use session::{
    play_ai_after, GameSession, NullSink, SeatKind, SeatedPlayer, SessionError, SessionStatus,
    StateSink,
};

// Crate-level exports - remote sync
pub use sync::{GameSnapshot, LastMove, SnapshotError};
