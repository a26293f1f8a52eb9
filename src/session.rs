//! Game sessions: seats, lifecycle status, the move funnel, and the
//! paced computer move.
//!
//! A session owns one playthrough. Every move, human or computer,
//! local or remote, goes through [`GameSession::handle_move`] and the
//! engine's validated entry point; the session performs no I/O beyond
//! pushing snapshots into the caller-supplied [`StateSink`].

use crate::advisor::{self, Strategy};
use crate::engine::{Game, Move, MoveError, MoveReport, Player, Position};
use crate::sync::{GameSnapshot, SnapshotError};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Unique identifier for a player.
pub type PlayerId = String;

/// Kind of participant seated in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatKind {
    /// Human player.
    Human,
    /// Computer opponent driven by the advisor.
    Computer,
}

/// A seated participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatedPlayer {
    /// Player's unique ID.
    pub id: PlayerId,
    /// Player's name.
    pub name: String,
    /// Kind of participant.
    pub kind: SeatKind,
    /// Which mark this player uses.
    pub mark: Player,
}

/// Lifecycle of a session, consumed by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    /// No seats taken yet.
    Idle,
    /// One seat taken.
    WaitingForOpponent,
    /// Both seats taken, game running.
    InProgress,
    /// Overall outcome reached.
    Decided,
}

/// Sink the caller owns for persistence and broadcast side effects.
///
/// The session pushes a snapshot here after every successful move; the
/// engine itself performs no I/O.
pub trait StateSink: Send + Sync {
    /// Receives the post-move snapshot.
    fn publish(&self, session_id: &str, snapshot: &GameSnapshot);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StateSink for NullSink {
    fn publish(&self, _session_id: &str, _snapshot: &GameSnapshot) {}
}

/// Errors surfaced by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// Both seats are taken.
    #[display("Session already has two players")]
    SessionFull,
    /// Unknown player id.
    #[display("Player {} is not seated in this session", _0)]
    NotSeated(#[error(not(source))] PlayerId),
    /// No player holds the seat for this mark.
    #[display("No player is seated as {}", _0)]
    SeatEmpty(#[error(not(source))] Player),
    /// Seated, but it is the other player's turn.
    #[display("It is not {}'s turn", _0)]
    NotYourTurn(#[error(not(source))] PlayerId),
    /// The engine rejected the move.
    #[display("Move rejected: {}", _0)]
    Rejected(#[error(source)] MoveError),
}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        SessionError::Rejected(err)
    }
}

/// One playthrough: the game plus its seats and lifecycle status.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    game: Game,
    player_x: Option<SeatedPlayer>,
    player_o: Option<SeatedPlayer>,
    status: SessionStatus,
    /// Bumped by reset, undo, and remote apply; a pending paced move
    /// scheduled against an older epoch is abandoned at fire time.
    epoch: u64,
}

impl GameSession {
    /// Creates a new session with no seats taken.
    #[instrument]
    pub fn new(id: SessionId) -> Self {
        info!(session_id = %id, "Creating new game session");
        Self {
            id,
            game: Game::new(),
            player_x: None,
            player_o: None,
            status: SessionStatus::Idle,
            epoch: 0,
        }
    }

    /// Returns the session ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the game state.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Returns the lifecycle status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns the current epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Seats a player in the first free seat, X first.
    /// Returns the mark assigned to the player.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn register_player(
        &mut self,
        id: PlayerId,
        name: String,
        kind: SeatKind,
    ) -> Result<Player, SessionError> {
        if self.player_x.is_none() {
            info!(player_id = %id, mark = "X", "Registering player as X");
            self.player_x = Some(SeatedPlayer {
                id,
                name,
                kind,
                mark: Player::X,
            });
            self.status = SessionStatus::WaitingForOpponent;
            Ok(Player::X)
        } else if self.player_o.is_none() {
            info!(player_id = %id, mark = "O", "Registering player as O");
            self.player_o = Some(SeatedPlayer {
                id,
                name,
                kind,
                mark: Player::O,
            });
            self.status = SessionStatus::InProgress;
            Ok(Player::O)
        } else {
            warn!(player_id = %id, "Session already has two players");
            Err(SessionError::SessionFull)
        }
    }

    /// Gets the seat held by the given player ID.
    pub fn get_player(&self, player_id: &str) -> Option<&SeatedPlayer> {
        if self.player_x.as_ref().map(|p| p.id.as_str()) == Some(player_id) {
            self.player_x.as_ref()
        } else if self.player_o.as_ref().map(|p| p.id.as_str()) == Some(player_id) {
            self.player_o.as_ref()
        } else {
            None
        }
    }

    /// Gets the seat holding the given mark.
    pub fn seat(&self, mark: Player) -> Option<&SeatedPlayer> {
        match mark {
            Player::X => self.player_x.as_ref(),
            Player::O => self.player_o.as_ref(),
        }
    }

    /// Checks if it's the given player's turn.
    pub fn is_players_turn(&self, player_id: &str) -> bool {
        match self.get_player(player_id) {
            Some(seat) => self.game.to_move() == seat.mark,
            None => {
                debug!(player_id, "Player not found in session");
                false
            }
        }
    }

    /// Applies a move for a seated player and publishes the result.
    #[instrument(skip(self, sink), fields(session_id = %self.id))]
    pub fn handle_move(
        &mut self,
        player_id: &str,
        board: Position,
        cell: Position,
        sink: &dyn StateSink,
    ) -> Result<MoveReport, SessionError> {
        let seat = self
            .get_player(player_id)
            .ok_or_else(|| SessionError::NotSeated(player_id.to_string()))?;
        let mark = seat.mark;
        if self.game.to_move() != mark {
            return Err(SessionError::NotYourTurn(player_id.to_string()));
        }

        let report = self.game.apply_move(Move::new(board, cell, mark))?;
        if report.status.is_over() {
            info!(session_id = %self.id, status = %report.status, "Game decided");
            self.status = SessionStatus::Decided;
        }
        sink.publish(&self.id, &self.game.snapshot());
        Ok(report)
    }

    /// Undoes the last move. Returns false on empty history.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn undo(&mut self) -> bool {
        match self.game.undo() {
            Some(_) => {
                self.epoch += 1;
                if self.status == SessionStatus::Decided {
                    self.status = SessionStatus::InProgress;
                }
                true
            }
            None => false,
        }
    }

    /// Resets the playthrough. Seats are kept.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn reset(&mut self) {
        self.game.reset();
        self.epoch += 1;
        self.status = match (&self.player_x, &self.player_o) {
            (Some(_), Some(_)) => SessionStatus::InProgress,
            (Some(_), None) | (None, Some(_)) => SessionStatus::WaitingForOpponent,
            (None, None) => SessionStatus::Idle,
        };
    }

    /// Replaces the game with a validated remote snapshot.
    ///
    /// Local state is untouched when validation rejects the snapshot.
    #[instrument(skip(self, snapshot), fields(session_id = %self.id))]
    pub fn apply_remote(&mut self, snapshot: &GameSnapshot) -> Result<(), SnapshotError> {
        self.game.apply_snapshot(snapshot)?;
        self.epoch += 1;
        self.status = if self.game.status().is_over() {
            SessionStatus::Decided
        } else {
            SessionStatus::InProgress
        };
        Ok(())
    }
}

/// Applies an advisor move for `mark` after a UX pacing delay.
///
/// Preconditions are re-checked at fire time, not only at schedule
/// time: if the session was reset, undone, resynced, or decided while
/// the delay ran, the pending move is dropped and `Ok(None)` is
/// returned.
pub async fn play_ai_after(
    session: Arc<Mutex<GameSession>>,
    mark: Player,
    strategy: Strategy,
    delay: Duration,
    sink: &dyn StateSink,
) -> Result<Option<MoveReport>, SessionError> {
    let (epoch, player_id) = {
        let guard = session.lock().expect("session mutex poisoned");
        let seat = guard.seat(mark).ok_or(SessionError::SeatEmpty(mark))?;
        (guard.epoch(), seat.id.clone())
    };

    tokio::time::sleep(delay).await;

    let mut guard = session.lock().expect("session mutex poisoned");
    if guard.epoch() != epoch {
        debug!(session_id = %guard.id(), "Paced move abandoned: session changed during delay");
        return Ok(None);
    }
    if guard.game().status().is_over() || guard.game().to_move() != mark {
        debug!(session_id = %guard.id(), "Paced move abandoned: no longer this seat's turn");
        return Ok(None);
    }
    let mv = match advisor::choose_move(guard.game(), mark, strategy) {
        Ok(mv) => mv,
        Err(err) => {
            warn!(session_id = %guard.id(), %err, "Advisor failed at fire time");
            return Ok(None);
        }
    };
    let report = guard.handle_move(&player_id, mv.board, mv.cell, sink)?;
    Ok(Some(report))
}
