//! Key-value blob storage behind the entity store.
//!
//! The store only ever needs `get`/`set` of whole strings under a fixed key,
//! so the backend is kept behind a tiny trait.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key '{0}' (use letters, digits, '-' or '_')")]
    InvalidKey(String),

    #[error("storage I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Synchronous string blob store
pub trait KeyValueStore {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
