//! Local key-value storage
//!
//! The store persists through a small async key-value interface modelled on
//! the device storage available to mobile apps: string keys, string values,
//! whole-value reads and writes.
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │              SubscriptionStore             │
//! │                     │                      │
//! │         KeyValueStorage (get/set/remove)   │
//! │          ┌──────────┴──────────┐           │
//! │          ▼                     ▼           │
//! │   InMemoryStorage         FileStorage      │
//! │   (tests, dry runs)    (one file per key)  │
//! └────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Storage error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Key not found in storage.
    NotFound,
    /// Permission denied by the platform.
    AccessDenied,
    /// Device is out of space.
    StorageFull,
    /// Stored bytes could not be decoded.
    Corrupt,
    /// Other I/O failure.
    Io,
    Unknown,
}

/// Error type for storage operations.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{code:?}: {message}")]
pub struct StorageError {
    pub code: StorageErrorCode,
    pub message: String,
}

impl StorageError {
    pub fn new(code: StorageErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::Corrupt, message)
    }

    pub fn is_corrupt(&self) -> bool {
        self.code == StorageErrorCode::Corrupt
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorCode::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorCode::AccessDenied,
            _ if err.raw_os_error() == Some(28) => StorageErrorCode::StorageFull, // ENOSPC
            _ => StorageErrorCode::Io,
        };
        Self::new(code, err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Async key-value storage.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the store shares one instance
/// behind an `Arc`.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// A successful return means the whole value is durable; a failed call
    /// must leave the previous value in place.
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`. Deleting an absent key is not an error.
    async fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// All keys currently stored.
    async fn keys(&self) -> StorageResult<Vec<String>>;
}

/// JSON helpers for any [`KeyValueStorage`].
#[async_trait]
pub trait KeyValueStorageExt: KeyValueStorage {
    /// Read and decode a JSON value.
    ///
    /// Undecodable content is reported as [`StorageErrorCode::Corrupt`].
    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.get_item(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::corrupt(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    /// Encode and store a JSON value.
    async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> StorageResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| StorageError::new(StorageErrorCode::Unknown, e.to_string()))?;
        self.set_item(key, &json).await
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorageExt for T {}

/// In-memory storage.
///
/// Contents live as long as the instance; used by tests and `--ephemeral`
/// runs.
#[derive(Default)]
pub struct InMemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for InMemoryStorage {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.data
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.data.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.data.read().await.keys().cloned().collect())
    }
}

/// File-backed storage: one `<encoded key>.json` file per key.
///
/// Writes go to a uniquely named sibling temp file that is fsynced and then
/// renamed over the target, so a crash mid-write leaves the previous value
/// intact. Writers (including other processes sharing the directory) take an
/// exclusive `fs2` lock on `<encoded key>.lock` for the duration of the swap.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    pub fn new(base_path: impl AsRef<Path>) -> StorageResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", encode_key(key)))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.lock", encode_key(key)))
    }
}

/// Run `f` while holding an exclusive lock on `lock_path` (blocks until
/// available).
fn with_key_lock<T>(lock_path: &Path, f: impl FnOnce() -> io::Result<T>) -> io::Result<T> {
    use fs2::FileExt;

    let lock = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;
    lock.lock_exclusive()?;

    let result = f();
    let unlocked = lock.unlock();
    let value = result?;
    unlocked?;
    Ok(value)
}

fn write_atomically(path: &Path, tmp: &Path, bytes: &[u8]) -> io::Result<()> {
    let result = (|| -> io::Result<()> {
        let mut file = File::create(tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        std::fs::rename(tmp, path)?;

        // Persist the rename itself
        #[cfg(unix)]
        if let Some(dir) = path.parent() {
            File::open(dir)?.sync_all()?;
        }
        Ok(())
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(tmp);
    }
    result
}

fn join_error(err: tokio::task::JoinError) -> StorageError {
    StorageError::new(StorageErrorCode::Unknown, err.to_string())
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        match tokio::fs::read_to_string(self.item_path(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.item_path(key);
        let lock_path = self.lock_path(key);
        let tmp = path.with_extension(format!("json.{}.tmp", uuid::Uuid::new_v4().simple()));
        let bytes = value.as_bytes().to_vec();

        tokio::task::spawn_blocking(move || {
            with_key_lock(&lock_path, || write_atomically(&path, &tmp, &bytes))
        })
        .await
        .map_err(join_error)??;

        tracing::trace!(key, bytes = value.len(), "wrote storage item");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        let path = self.item_path(key);
        let lock_path = self.lock_path(key);

        tokio::task::spawn_blocking(move || {
            with_key_lock(&lock_path, || match std::fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e),
            })
        })
        .await
        .map_err(join_error)??;
        Ok(())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.base_path).await?;

        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(stem) = name.strip_suffix(".json") {
                if let Some(key) = decode_key(stem) {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}

/// Percent-encode a key into a portable file name
/// (`@subscriptions` -> `%40subscriptions`).
fn encode_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

/// Inverse of [`encode_key`]. Names that `encode_key` could not have produced
/// (malformed escapes, lowercase hex, stray files) yield `None`.
fn decode_key(encoded: &str) -> Option<String> {
    let decoded = urlencoding::decode(encoded).ok()?;
    (encode_key(&decoded) == encoded).then(|| decoded.into_owned())
}
