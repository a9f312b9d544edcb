//! Process-wide map from game id to session.
//!
//! The registry lock guards only the map. It is always released before a
//! session lock is taken and is never held across storage I/O or an await.

use crate::clock::Clock;
use crate::games::ayu::{DEFAULT_SIZE, GameState, Move};
use crate::session::{
    GAME_KIND, GameId, GameSession, PollOutcome, SessionError, SessionRecord, decode, persist,
};
use crate::storage::StorageBackend;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Reply to a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedGame {
    /// Id of the new game.
    pub game_id: GameId,
    /// Keys for White (index 0) and Black (index 1).
    pub keys: [String; 2],
    /// Board side length.
    pub size: usize,
}

/// Manages all game sessions.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<GameId, Arc<GameSession>>>,
    storage: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
}

/// 20 hex characters from 10 random bytes.
fn random_key() -> String {
    let mut bytes = [0u8; 10];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

impl SessionRegistry {
    /// Creates an empty registry backed by `storage`.
    #[instrument(skip_all)]
    pub fn new(storage: Arc<dyn StorageBackend>, clock: Arc<dyn Clock>) -> Self {
        info!("Creating session registry");
        Self {
            sessions: Mutex::new(HashMap::new()),
            storage,
            clock,
        }
    }

    /// Storage backend snapshots are written to.
    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Clock used for move timing.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<GameId, Arc<GameSession>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of games held in memory.
    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    /// Whether no game is held in memory.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a game with fresh id and keys.
    ///
    /// `size` defaults to 11. The initial snapshot is saved straight away;
    /// a failed save is logged and the game is still created.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidGame`] for unsupported board sizes
    /// - [`SessionError::IdCollision`] if the generated id is already taken,
    ///   in memory or in storage
    /// - [`SessionError::Storage`] if storage cannot tell whether the id is taken
    #[instrument(skip(self))]
    pub fn create(&self, size: Option<usize>) -> Result<CreatedGame, SessionError> {
        let size = size.unwrap_or(DEFAULT_SIZE);
        let game = GameState::new(size)?;
        let id = random_key();
        let keys = [random_key(), random_key()];
        let record = SessionRecord::new(game, keys.clone());

        if self.storage.load(GAME_KIND, &id)?.is_some() {
            warn!(game_id = %id, "Generated game id already stored");
            return Err(SessionError::IdCollision(id));
        }

        {
            let mut sessions = self.sessions();
            match sessions.entry(id.clone()) {
                Entry::Occupied(_) => {
                    warn!(game_id = %id, "Generated game id already in use");
                    return Err(SessionError::IdCollision(id));
                }
                Entry::Vacant(slot) => {
                    slot.insert(Arc::new(GameSession::new(id.clone(), record.clone())));
                }
            }
        }

        persist(&id, &record, self.storage());
        info!(game_id = %id, size, "Game created");
        Ok(CreatedGame {
            game_id: id,
            keys,
            size,
        })
    }

    /// Looks a game up, loading it from storage on a miss.
    ///
    /// If two callers load the same game concurrently, the first one to
    /// install it wins and the other copy is dropped.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotFound`] if the game is neither in memory nor stored
    /// - [`SessionError::Storage`] if the backend failed
    /// - [`SessionError::Corrupt`] if the stored record cannot be decoded
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Result<Arc<GameSession>, SessionError> {
        if let Some(session) = self.sessions().get(id) {
            return Ok(Arc::clone(session));
        }

        debug!("Game not in memory, loading from storage");
        let bytes = self
            .storage
            .load(GAME_KIND, id)?
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        let record = decode(id, &bytes)?;
        let loaded = Arc::new(GameSession::new(id.to_string(), record));

        let session = Arc::clone(self.sessions().entry(id.to_string()).or_insert(loaded));
        info!(game_id = %id, "Game loaded from storage");
        Ok(session)
    }

    /// Submits a move. Returns the new version.
    ///
    /// # Errors
    ///
    /// See [`SessionRegistry::get`] and [`GameSession::update`].
    #[instrument(skip(self, key))]
    pub async fn update(
        &self,
        id: &str,
        version: usize,
        key: &str,
        mv: Move,
    ) -> Result<usize, SessionError> {
        let session = self.get(id)?;
        session
            .update(version, key, mv, self.clock.now(), self.storage())
            .await
    }

    /// Waits for a game to reach `version`.
    ///
    /// # Errors
    ///
    /// See [`SessionRegistry::get`]. A timeout is reported as
    /// [`PollOutcome::NoUpdate`], not as an error.
    #[instrument(skip(self))]
    pub async fn poll(
        &self,
        id: &str,
        version: usize,
        timeout: Duration,
    ) -> Result<PollOutcome, SessionError> {
        let session = self.get(id)?;
        Ok(session.poll(version, timeout, self.clock()).await)
    }
}
