//! File storage backing the `/files/` routes
//!
//! Handlers only see the [`FileStore`] trait. [`DiskStore`] is what the
//! binary uses; [`MemoryStore`] keeps everything in a map.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

#[derive(Debug)]
pub enum StoreError {
    /// Nothing stored under the path
    NotFound,
    /// Any other I/O failure
    Io(io::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "file not found"),
            StoreError::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound,
            _ => StoreError::Io(e),
        }
    }
}

/// Byte-level read/write access to files by path.
pub trait FileStore: Send + Sync + 'static {
    /// Returns the whole contents stored at `path`.
    fn read(&self, path: &Path) -> impl Future<Output = Result<Vec<u8>, StoreError>> + Send;

    /// Creates or overwrites `path` with `data`.
    fn write(&self, path: &Path, data: &[u8]) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Store backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl FileStore for DiskStore {
    async fn read(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        Ok(tokio::fs::read(path).await?)
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<(), StoreError> {
        tokio::fs::write(path, data).await?;
        Ok(())
    }
}

/// In-memory store. Writes never fail unless the path is listed in
/// `read_only`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RwLock<HashMap<PathBuf, Vec<u8>>>,
    read_only: Vec<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths under any of `prefixes` reject writes with a permission error.
    pub fn with_read_only(prefixes: Vec<PathBuf>) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            read_only: prefixes,
        }
    }

    pub async fn insert(&self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) {
        self.files.write().await.insert(path.into(), data.into());
    }

    pub async fn contains(&self, path: &Path) -> bool {
        self.files.read().await.contains_key(path)
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl FileStore for MemoryStore {
    async fn read(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        self.files
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<(), StoreError> {
        if self.read_only.iter().any(|p| path.starts_with(p)) {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only path",
            )));
        }
        self.files
            .write()
            .await
            .insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }
}
