#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Durable key-value storage for the Sentinel Shopfloor journal
//!
//! This crate manages the data directory where each key is mirrored to a
//! single JSON document (`<key>.json`). Writes go through a temp file and
//! an atomic rename, so readers never observe a partial value. Reading an
//! absent key yields `None` rather than an error.

use sentinel_errors::{Error, StorageError};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// File-backed key-value slot store
#[derive(Clone, Debug)]
pub struct KvStore {
    base_path: PathBuf,
}

impl KvStore {
    /// Create a new store instance rooted at `base_path`
    #[must_use]
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Base directory holding the key files
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Create the data directory if it does not exist yet
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub async fn init(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &self.base_path))?;
        Ok(())
    }

    /// Get the file path backing a key
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` when the key is empty or contains
    /// characters that could escape the data directory.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf, Error> {
        if !valid_key(key) {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            }
            .into());
        }
        Ok(self.base_path.join(format!("{key}.json")))
    }

    /// Check whether a key currently has a stored value
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` for malformed keys, or a storage
    /// error for I/O failures other than the file being absent.
    pub async fn contains(&self, key: &str) -> Result<bool, Error> {
        let path = self.slot_path(key)?;
        match fs::try_exists(&path).await {
            Ok(present) => Ok(present),
            Err(e) => Err(StorageError::from_io_with_path(&e, &path).into()),
        }
    }

    /// Read the value stored under `key`
    ///
    /// Returns `None` when the key has never been written or was removed.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid keys or I/O failures other than the
    /// file being absent.
    pub async fn read(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::from_io_with_path(&e, &path).into()),
        }
    }

    /// Write `value` under `key`, replacing any previous value
    ///
    /// The value lands in a temp file first and is renamed into place, so a
    /// concurrent reader sees either the old value or the new one, never a
    /// prefix.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid keys or if the write or rename fails.
    pub async fn write(&self, key: &str, value: &str) -> Result<(), Error> {
        let path = self.slot_path(key)?;
        let tmp_path = self
            .base_path
            .join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()));

        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &tmp_path))?;
        file.write_all(value.as_bytes())
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &tmp_path))?;
        file.sync_all()
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &tmp_path))?;
        drop(file);

        fs::rename(&tmp_path, &path).await.map_err(|e| {
            StorageError::AtomicRenameFailed {
                message: format!("{} -> {}: {e}", tmp_path.display(), path.display()),
            }
        })?;

        tracing::debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    /// Remove the value stored under `key`
    ///
    /// Removing an absent key is not an error; after removal a `read`
    /// returns `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid keys or I/O failures other than the
    /// file being absent.
    pub async fn remove(&self, key: &str) -> Result<(), Error> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(key, "removed value");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io_with_path(&e, &path).into()),
        }
    }
}

/// Keys are restricted to a flat namespace inside the data directory.
fn valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !key.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, KvStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = KvStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[tokio::test]
    async fn read_missing_key_is_none() {
        let (_dir, store) = store();
        store.init().await.unwrap();
        assert_eq!(store.read("access_scan_history").await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let (_dir, store) = store();
        store.init().await.unwrap();
        store.write("slot", "[1,2,3]").await.unwrap();
        assert_eq!(store.read("slot").await.unwrap().as_deref(), Some("[1,2,3]"));
    }

    #[tokio::test]
    async fn write_overwrites_previous_value() {
        let (_dir, store) = store();
        store.init().await.unwrap();
        store.write("slot", "old").await.unwrap();
        store.write("slot", "new").await.unwrap();
        assert_eq!(store.read("slot").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let (_dir, store) = store();
        store.init().await.unwrap();
        store.write("slot", "value").await.unwrap();
        store.remove("slot").await.unwrap();
        store.remove("slot").await.unwrap();
        assert_eq!(store.read("slot").await.unwrap(), None);
        assert!(!store.contains("slot").await.unwrap());
    }

    #[tokio::test]
    async fn contains_surfaces_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        // Root the store at a regular file so path resolution fails with a
        // real error, not "absent".
        let file = dir.path().join("not-a-directory");
        std::fs::write(&file, "x").unwrap();
        let store = KvStore::new(file);
        assert!(store.contains("slot").await.is_err());
    }

    #[tokio::test]
    async fn invalid_keys_are_rejected() {
        let (_dir, store) = store();
        store.init().await.unwrap();
        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(store.read(key).await.is_err(), "key {key:?} should be invalid");
        }
    }
}
