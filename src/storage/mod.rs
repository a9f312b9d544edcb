//! Durable key/value storage for game snapshots.
//!
//! The session layer only needs two operations over opaque byte blobs, so
//! backends are swappable without touching game logic.

mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Byte-blob persistence addressed by a record kind and a key.
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Stores `value`, replacing any previous record under the same key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the record could not be written.
    fn save(&self, kind: &str, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Loads a record. Returns `None` if nothing is stored under the key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend failed to read.
    fn load(&self, kind: &str, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
}
