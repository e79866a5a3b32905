//! Local download directory - implementation of DownloadSink.
//!
//! Writes exported reports into a single directory using atomic writes and
//! reports a SHA-256 checksum of what was written.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::ports::{DownloadSink, ExportError, ExportedDocument, SavedDownload};

/// Maximum document size accepted (25 MB).
const MAX_DOCUMENT_BYTES: usize = 25 * 1024 * 1024;

/// Saves documents into a download directory.
///
/// # Atomic Writes
///
/// 1. Write content to `{filename}.tmp`
/// 2. Sync to disk
/// 3. Rename to `{filename}`
///
/// A second export of the same report replaces the first.
///
/// # Usage
///
/// ```rust,ignore
/// let sink = LocalDownloadSink::new("downloads");
/// let saved = sink.save(&document).await?;
/// println!("Saved {} ({} bytes)", saved.path.display(), saved.size_bytes);
/// ```
#[derive(Debug, Clone)]
pub struct LocalDownloadSink {
    dir: PathBuf,
}

impl LocalDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Computes SHA-256 checksum of the given content.
    fn compute_checksum(content: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content);
        hex::encode(hasher.finalize())
    }

    /// Rejects names that would escape the download directory.
    fn target_path(&self, filename: &str) -> Result<PathBuf, ExportError> {
        let name = Path::new(filename);
        let is_plain = name.file_name().map(|n| n == name.as_os_str()).unwrap_or(false);
        if filename.trim().is_empty() || !is_plain {
            return Err(ExportError::io_error(format!(
                "Invalid download filename: {}",
                filename
            )));
        }
        Ok(self.dir.join(name))
    }
}

#[async_trait]
impl DownloadSink for LocalDownloadSink {
    async fn save(&self, document: &ExportedDocument) -> Result<SavedDownload, ExportError> {
        if document.size() > MAX_DOCUMENT_BYTES {
            return Err(ExportError::io_error(format!(
                "Document too large: {} bytes (max {})",
                document.size(),
                MAX_DOCUMENT_BYTES
            )));
        }

        let final_path = self.target_path(&document.filename)?;
        let temp_path = self.dir.join(format!("{}.tmp", document.filename));

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            ExportError::io_error(format!(
                "Failed to create download directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            ExportError::io_error(format!(
                "Failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        file.write_all(&document.content).await.map_err(|e| {
            ExportError::io_error(format!(
                "Failed to write to temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        file.sync_all().await.map_err(|e| {
            ExportError::io_error(format!(
                "Failed to sync temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        fs::rename(&temp_path, &final_path).await.map_err(|e| {
            ExportError::io_error(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            ))
        })?;

        let saved = SavedDownload {
            path: final_path,
            checksum: Self::compute_checksum(&document.content),
            size_bytes: document.size() as u64,
        };
        tracing::info!(
            path = %saved.path.display(),
            size_bytes = saved.size_bytes,
            format = %document.format,
            "Report saved"
        );
        Ok(saved)
    }
}
