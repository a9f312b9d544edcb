//! Ayu game server library.
//!
//! # Architecture
//!
//! - **Games**: the Ayu rules engine (board, notation, move validation)
//! - **Session**: one game behind its own lock, with keys, clocks and
//!   long-poll waiters
//! - **Registry**: game id to session map, loading from storage on a miss
//! - **Storage**: byte-blob persistence with memory and file backends
//! - **Api**: thin HTTP surface over the registry
//!
//! # Example
//!
//! ```no_run
//! use ayu_server::{MemoryStorage, SessionRegistry, SystemClock};
//! use std::sync::Arc;
//!
//! let registry = SessionRegistry::new(Arc::new(MemoryStorage::new()), Arc::new(SystemClock));
//! let created = registry.create(None)?;
//! assert_eq!(created.size, 11);
//! # Ok::<(), ayu_server::SessionError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod clock;
mod config;
mod games;
mod registry;
mod session;
mod storage;

// Crate-level exports - Rules engine
pub use games::ayu::{
    Board, Coord, DEFAULT_SIZE, GameError, GameState, MAX_SIZE, MIN_SIZE, Move, MoveError,
    ParseError, Player, Square, render_fields, rules,
};

// Crate-level exports - Sessions
pub use registry::{CreatedGame, SessionRegistry};
pub use session::{
    GAME_KIND, GameId, GameSession, GameView, PollOutcome, SessionError, SessionRecord,
};

// Crate-level exports - Storage
pub use storage::{FileStorage, MemoryStorage, StorageBackend, StorageError};

// Crate-level exports - Time
pub use clock::{Clock, ManualClock, SystemClock};

// Crate-level exports - Configuration
pub use config::{ConfigError, ConfigOverrides, ServerConfig};

// Crate-level exports - HTTP
pub use api::{ApiError, AppState, CreateRequest, PollQuery, UpdateRequest, router, serve};
