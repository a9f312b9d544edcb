//! Game session management for long-poll multiplayer.
//!
//! A [`GameSession`] owns one game behind its own lock. Writers must name the
//! exact version they last observed and present the key of the player to
//! move. Readers either get the state straight away or park a oneshot
//! channel in the session's waiter queue until the next accepted move or
//! their deadline.

use crate::clock::Clock;
use crate::games::ayu::{GameError, GameState, Move, MoveError};
use crate::storage::{StorageBackend, StorageError};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::{Mutex, oneshot};
use tokio::time::{self, Instant};
use tracing::{debug, info, instrument, warn};

/// Unique identifier of a game.
pub type GameId = String;

/// Storage kind under which game snapshots are saved.
pub const GAME_KIND: &str = "Game";

/// Error returned by session and registry operations.
#[derive(Debug, Clone, derive_more::Display)]
pub enum SessionError {
    /// No game with this id exists in memory or in storage.
    #[display("Game {} not found", _0)]
    NotFound(GameId),

    /// The caller acted on a stale version.
    #[display("Version conflict: game is at version {}, update was for {}", current, requested)]
    Conflict {
        /// Version the game is at.
        current: usize,
        /// Version named by the caller.
        requested: usize,
    },

    /// The key does not belong to the player to move.
    #[display("Key does not belong to the player to move")]
    Forbidden,

    /// The move breaks the rules.
    #[display("Illegal move: {}", _0)]
    IllegalMove(MoveError),

    /// The game could not be created.
    #[display("Invalid game: {}", _0)]
    InvalidGame(GameError),

    /// A freshly generated game id was already taken.
    #[display("Game id {} already in use", _0)]
    IdCollision(GameId),

    /// Storage failed while loading a game.
    #[display("{}", _0)]
    Storage(StorageError),

    /// A stored snapshot could not be decoded.
    #[display("Stored game {} is corrupt: {}", id, reason)]
    Corrupt {
        /// Game id of the record.
        id: GameId,
        /// Decoder message.
        reason: String,
    },
}

impl std::error::Error for SessionError {}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        Self::IllegalMove(err)
    }
}

impl From<GameError> for SessionError {
    fn from(err: GameError) -> Self {
        Self::InvalidGame(err)
    }
}

impl From<StorageError> for SessionError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

/// Durable part of a session: everything needed to resume a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Board and move history.
    game: GameState,
    /// Capability keys, indexed by player.
    keys: [String; 2],
    /// Seconds spent thinking so far, indexed by player.
    time_used: [f64; 2],
    /// When the last move was accepted.
    last_move_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Creates the record of a game that has not started yet.
    pub fn new(game: GameState, keys: [String; 2]) -> Self {
        Self {
            game,
            keys,
            time_used: [0.0, 0.0],
            last_move_at: None,
        }
    }

    /// Time used per player, counting the running clock of the player to move.
    pub fn time_used_at(&self, now: DateTime<Utc>) -> [f64; 2] {
        let mut used = self.time_used;
        if let Some(last) = self.last_move_at {
            used[self.game.player().index()] += seconds_between(last, now);
        }
        used
    }

    /// Read-only view sent to pollers.
    pub fn view(&self, now: DateTime<Utc>) -> GameView {
        GameView {
            next_player: self.game.player().index(),
            board_size: self.game.board().size(),
            fields: self.game.board().fields(),
            history: self.game.history().to_vec(),
            time_used: self.time_used_at(now),
        }
    }
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    ((to - from).num_milliseconds() as f64 / 1000.0).max(0.0)
}

/// Snapshot of a game as reported to pollers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    /// Player to move (0 = White, 1 = Black).
    pub next_player: usize,
    /// Board side length.
    pub board_size: usize,
    /// Board as rows of 0 / +1 / -1.
    pub fields: Vec<Vec<i8>>,
    /// Moves played so far.
    pub history: Vec<Move>,
    /// Seconds used per player, including the running clock.
    pub time_used: [f64; 2],
}

/// Result of a poll.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The game reached the requested version.
    Ready(GameView),
    /// The timeout elapsed first.
    NoUpdate,
}

#[derive(Debug)]
struct Waiter {
    ticket: u64,
    sender: oneshot::Sender<()>,
}

#[derive(Debug)]
struct SessionState {
    record: SessionRecord,
    waiters: VecDeque<Waiter>,
    next_ticket: u64,
}

impl SessionState {
    fn register(&mut self, sender: oneshot::Sender<()>) -> u64 {
        // Pollers dropped mid-wait leave closed senders behind.
        self.waiters.retain(|waiter| !waiter.sender.is_closed());
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.waiters.push_back(Waiter { ticket, sender });
        ticket
    }

    fn cancel(&mut self, ticket: u64) {
        self.waiters.retain(|waiter| waiter.ticket != ticket);
    }

    fn wake_all(&mut self) -> usize {
        let count = self.waiters.len();
        for waiter in self.waiters.drain(..) {
            // The receiver is gone if its poll already timed out.
            let _ = waiter.sender.send(());
        }
        count
    }
}

/// One game with its keys, clocks and pending pollers.
#[derive(Debug)]
pub struct GameSession {
    id: GameId,
    state: Mutex<SessionState>,
}

impl GameSession {
    /// Wraps a record in a session with no waiters.
    pub fn new(id: GameId, record: SessionRecord) -> Self {
        Self {
            id,
            state: Mutex::new(SessionState {
                record,
                waiters: VecDeque::new(),
                next_ticket: 0,
            }),
        }
    }

    /// Number of moves accepted so far.
    pub async fn version(&self) -> usize {
        self.state.lock().await.record.game.version()
    }

    /// Copy of the durable state.
    pub async fn record(&self) -> SessionRecord {
        self.state.lock().await.record.clone()
    }

    /// Current view of the game.
    pub async fn view(&self, now: DateTime<Utc>) -> GameView {
        self.state.lock().await.record.view(now)
    }

    /// Number of pollers currently parked on this game.
    pub async fn waiter_count(&self) -> usize {
        self.state.lock().await.waiters.len()
    }

    /// Applies a move on behalf of the player holding `key`.
    ///
    /// On success the mover's clock is charged, the snapshot is saved and
    /// every parked poller is woken. Returns the new version.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Conflict`] if `version` is not the current version
    /// - [`SessionError::Forbidden`] if `key` is not the key of the player to move
    /// - [`SessionError::IllegalMove`] if the rules reject the move
    #[instrument(skip(self, key, storage), fields(game_id = %self.id))]
    pub async fn update(
        &self,
        version: usize,
        key: &str,
        mv: Move,
        now: DateTime<Utc>,
        storage: &dyn StorageBackend,
    ) -> Result<usize, SessionError> {
        let mut state = self.state.lock().await;
        let record = &mut state.record;

        let current = record.game.version();
        if version != current {
            warn!(current, requested = version, "Stale update rejected");
            return Err(SessionError::Conflict {
                current,
                requested: version,
            });
        }

        let mover = record.game.player();
        if key != record.keys[mover.index()] {
            warn!(mover = ?mover, "Update with wrong key rejected");
            return Err(SessionError::Forbidden);
        }

        record.game.apply(mv).map_err(|e| {
            warn!(error = %e, "Illegal move rejected");
            SessionError::IllegalMove(e)
        })?;

        if let Some(last) = record.last_move_at {
            record.time_used[mover.index()] += seconds_between(last, now);
        }
        record.last_move_at = Some(now);

        let new_version = record.game.version();
        persist(&self.id, record, storage);
        let woken = state.wake_all();

        info!(
            version = new_version,
            mover = ?mover,
            woken,
            "Move accepted"
        );
        Ok(new_version)
    }

    /// Waits until the game reaches `version` or `timeout` elapses.
    ///
    /// The waiter is queued before the lock is released, so a move accepted
    /// in between still wakes it. Every wake re-checks the version. A timeout
    /// too large to express as a deadline waits without one.
    #[instrument(skip(self, clock), fields(game_id = %self.id))]
    pub async fn poll(&self, version: usize, timeout: Duration, clock: &dyn Clock) -> PollOutcome {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.state.lock().await;
        loop {
            if state.record.game.version() >= version {
                debug!(current = state.record.game.version(), "Version reached");
                return PollOutcome::Ready(state.record.view(clock.now()));
            }

            let (sender, receiver) = oneshot::channel();
            let ticket = state.register(sender);
            drop(state);

            let woken = match deadline {
                Some(deadline) => time::timeout_at(deadline, receiver).await.is_ok(),
                None => receiver.await.is_ok(),
            };
            state = self.state.lock().await;
            if !woken {
                state.cancel(ticket);
                debug!("Poll timed out");
                return PollOutcome::NoUpdate;
            }
        }
    }
}

/// Saves a snapshot; failures only degrade durability and are logged.
pub(crate) fn persist(id: &str, record: &SessionRecord, storage: &dyn StorageBackend) {
    let bytes = match serde_json::to_vec(record) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(game_id = %id, error = %e, "Failed to encode game snapshot");
            return;
        }
    };
    match storage.save(GAME_KIND, id, &bytes) {
        Ok(()) => debug!(game_id = %id, bytes = bytes.len(), "Game snapshot saved"),
        Err(e) => warn!(game_id = %id, error = %e, "Failed to save game snapshot"),
    }
}

/// Decodes a stored snapshot.
pub(crate) fn decode(id: &str, bytes: &[u8]) -> Result<SessionRecord, SessionError> {
    serde_json::from_slice(bytes).map_err(|e| SessionError::Corrupt {
        id: id.to_string(),
        reason: e.to_string(),
    })
}
