//! Saving marked photos to device storage.
//!
//! The destination is computed once, when the [`SaveTarget`] is created at
//! startup: `<downloads-dir>/<startup-unix-ms>.png`. Every save in the same
//! session writes to that one path, so a second save overwrites the first.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{PNG_DATA_URI_PREFIX, SAVED_FILE_EXTENSION};

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Payload is not a PNG data URI")]
    MissingPayloadPrefix,

    #[error("Payload is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fixed destination for saved photos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTarget {
    path: PathBuf,
}

impl SaveTarget {
    /// Destination stamped with the current time.
    pub fn at_startup(downloads_dir: impl AsRef<Path>) -> Self {
        Self::with_timestamp(downloads_dir, chrono::Utc::now().timestamp_millis())
    }

    pub fn with_timestamp(downloads_dir: impl AsRef<Path>, unix_ms: i64) -> Self {
        Self {
            path: downloads_dir
                .as_ref()
                .join(format!("{}.{}", unix_ms, SAVED_FILE_EXTENSION)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Raw base64 content of a PNG data URI.
pub fn split_payload(payload: &str) -> Result<&str, PersistenceError> {
    payload
        .split(PNG_DATA_URI_PREFIX)
        .nth(1)
        .ok_or(PersistenceError::MissingPayloadPrefix)
}

/// Filesystem writes used by the save flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Decode `content` from base64 and write the bytes to `path`.
    async fn write_base64(&self, path: &Path, content: &str) -> Result<(), PersistenceError>;
}

/// Filesystem backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

#[async_trait]
impl FileSystem for TokioFileSystem {
    async fn write_base64(&self, path: &Path, content: &str) -> Result<(), PersistenceError> {
        let bytes = STANDARD
            .decode(content.trim())
            .map_err(|e| PersistenceError::InvalidBase64(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| PersistenceError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(path, bytes)
            .await
            .map_err(|source| PersistenceError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Write the payload to the session's save target.
pub async fn save_payload(
    fs: &dyn FileSystem,
    target: &SaveTarget,
    payload: &str,
) -> Result<PathBuf, PersistenceError> {
    let content = split_payload(payload)?;
    fs.write_base64(target.path(), content).await?;
    tracing::info!(path = %target.path().display(), "Photo saved");
    Ok(target.path().to_path_buf())
}
