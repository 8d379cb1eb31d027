//! Cart storage
//!
//! A cart must survive a restart within the same session. Storage backends
//! persist the full cart snapshot under a session key and hand back the last
//! one saved.

use std::{
    cell::RefCell,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::cart::Cart;

/// Errors reading or writing cart snapshots.
#[derive(Debug, Error)]
pub enum CartStorageError {
    /// The session key contains characters that are not allowed.
    #[error("invalid cart session key: {0:?}")]
    InvalidKey(String),

    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The snapshot could not be encoded or decoded.
    #[error(transparent)]
    Serialization(#[from] serde_norway::Error),
}

/// Identifies one browsing session's cart.
///
/// Keys are limited to ASCII letters, digits, `-` and `_` so they are safe to
/// use as file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    /// Parses a session key.
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError::InvalidKey`] for empty keys or keys with
    /// disallowed characters.
    pub fn parse(key: &str) -> Result<Self, CartStorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(CartStorageError::InvalidKey(key.to_string()));
        }

        Ok(Self(key.to_string()))
    }

    /// The key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Durable store for cart snapshots.
pub trait CartStorage {
    /// Loads the last snapshot saved for `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStorageError`] if the snapshot exists but cannot be read.
    fn load(&self, key: &SessionKey) -> Result<Option<Cart>, CartStorageError>;

    /// Replaces the snapshot for `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStorageError`] if the snapshot cannot be written.
    fn save(&self, key: &SessionKey, cart: &Cart) -> Result<(), CartStorageError>;

    /// Removes the snapshot for `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStorageError`] if the snapshot cannot be removed.
    fn discard(&self, key: &SessionKey) -> Result<(), CartStorageError>;
}

/// Stores each session's cart as a YAML file in a directory.
#[derive(Debug, Clone)]
pub struct FileCartStorage {
    dir: PathBuf,
}

impl FileCartStorage {
    /// Uses `dir` for snapshots, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError::Io`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CartStorageError> {
        let dir = dir.into();

        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    /// Snapshot directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &SessionKey) -> PathBuf {
        self.dir.join(format!("{key}.yaml"))
    }
}

impl CartStorage for FileCartStorage {
    fn load(&self, key: &SessionKey) -> Result<Option<Cart>, CartStorageError> {
        let contents = match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(serde_norway::from_str(&contents)?))
    }

    fn save(&self, key: &SessionKey, cart: &Cart) -> Result<(), CartStorageError> {
        let contents = serde_norway::to_string(cart)?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.yaml.tmp"));

        // Readers only ever see a complete snapshot.
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;

        Ok(())
    }

    fn discard(&self, key: &SessionKey) -> Result<(), CartStorageError> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// Keeps encoded snapshots in memory. Owned by a single session.
#[derive(Debug, Default)]
pub struct MemoryCartStorage {
    snapshots: RefCell<FxHashMap<SessionKey, String>>,
}

impl MemoryCartStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.borrow().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.snapshots.borrow().is_empty()
    }
}

impl CartStorage for MemoryCartStorage {
    fn load(&self, key: &SessionKey) -> Result<Option<Cart>, CartStorageError> {
        self.snapshots
            .borrow()
            .get(key)
            .map(|contents| serde_norway::from_str(contents))
            .transpose()
            .map_err(CartStorageError::from)
    }

    fn save(&self, key: &SessionKey, cart: &Cart) -> Result<(), CartStorageError> {
        let contents = serde_norway::to_string(cart)?;

        self.snapshots.borrow_mut().insert(key.clone(), contents);

        Ok(())
    }

    fn discard(&self, key: &SessionKey) -> Result<(), CartStorageError> {
        self.snapshots.borrow_mut().remove(key);

        Ok(())
    }
}

impl<S: CartStorage + ?Sized> CartStorage for &S {
    fn load(&self, key: &SessionKey) -> Result<Option<Cart>, CartStorageError> {
        (**self).load(key)
    }

    fn save(&self, key: &SessionKey, cart: &Cart) -> Result<(), CartStorageError> {
        (**self).save(key, cart)
    }

    fn discard(&self, key: &SessionKey) -> Result<(), CartStorageError> {
        (**self).discard(key)
    }
}
