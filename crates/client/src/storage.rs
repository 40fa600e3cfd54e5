//! Durable client-side storage.
//!
//! The bearer token outlives the process: it is read once at startup and
//! written on every login and logout. There are no transactional
//! guarantees; the last write wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{ClientError, Result};

/// Where the bearer token is persisted between runs.
pub trait TokenStorage: Send + Sync {
    /// Read the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the backing store is unreadable.
    fn load(&self) -> Result<Option<SecretString>>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the write fails.
    fn save(&self, token: &SecretString) -> Result<()>;

    /// Remove the stored token. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the removal fails.
    fn clear(&self) -> Result<()>;
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token kept in a small JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<SecretString>> {
        let stored: Option<StoredToken> = read_json(&self.path)?;
        Ok(stored
            .filter(|s| !s.token.is_empty())
            .map(|s| SecretString::from(s.token)))
    }

    fn save(&self, token: &SecretString) -> Result<()> {
        write_json(
            &self.path,
            &StoredToken {
                token: token.expose_secret().to_string(),
                saved_at: Utc::now(),
            },
        )
    }

    fn clear(&self) -> Result<()> {
        remove_file(&self.path)
    }
}

/// Token kept in memory only. Used by tests and one-off tools.
#[derive(Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<SecretString>>,
}

impl MemoryTokenStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already stored, as if saved by an earlier run.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(SecretString::from(token))),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<SecretString>> {
        Ok(self.token.lock().clone())
    }

    fn save(&self, token: &SecretString) -> Result<()> {
        *self.token.lock() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock() = None;
        Ok(())
    }
}

// =============================================================================
// JSON file helpers
// =============================================================================

/// Read a JSON document. A missing file reads as `None`.
///
/// # Errors
///
/// Returns `ClientError::Storage` for I/O failures and malformed JSON.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(storage_error(path, &e)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| storage_error(path, &e))
}

/// Write a JSON document, creating parent directories as needed.
///
/// Writes to a sibling temp file and renames it over the target so a
/// crash mid-write never leaves a truncated file behind.
///
/// # Errors
///
/// Returns `ClientError::Storage` if any filesystem step fails.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| storage_error(parent, &e))?;
    }
    let json = serde_json::to_vec_pretty(value).map_err(|e| storage_error(path, &e))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| storage_error(&tmp, &e))?;
    fs::rename(&tmp, path).map_err(|e| storage_error(path, &e))
}

/// Remove a file. A missing file is not an error.
///
/// # Errors
///
/// Returns `ClientError::Storage` for any other I/O failure.
pub fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(storage_error(path, &e)),
    }
}

fn storage_error(path: &Path, err: &dyn std::fmt::Display) -> ClientError {
    ClientError::Storage(format!("{}: {err}", path.display()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("nested/session.json"));

        assert!(storage.load().unwrap().is_none());

        storage.save(&SecretString::from("tok-123")).unwrap();
        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.expose_secret(), "tok-123");

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
        // Clearing twice is fine
        storage.clear().unwrap();
    }

    #[test]
    fn test_file_storage_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, b"not json").unwrap();

        let err = FileTokenStorage::new(&path).load().unwrap_err();
        assert!(matches!(err, ClientError::Storage(_)));
    }

    #[test]
    fn test_empty_token_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, br#"{"token":"","savedAt":"2025-12-23T10:00:00Z"}"#).unwrap();

        assert!(FileTokenStorage::new(&path).load().unwrap().is_none());
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryTokenStorage::with_token("abc");
        assert_eq!(storage.load().unwrap().unwrap().expose_secret(), "abc");
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }
}
