//! Download Sink Port - Where exported reports end up.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{ExportError, ExportedDocument};

/// A document that has been written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDownload {
    pub path: PathBuf,
    /// SHA-256 of the content, hex encoded.
    pub checksum: String,
    pub size_bytes: u64,
}

/// Port for delivering an exported document to the user.
///
/// # Contract
///
/// Implementations must:
/// - Write atomically (no partial file on failure)
/// - Use the document's own filename
/// - Overwrite an earlier download of the same name
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn save(&self, document: &ExportedDocument) -> Result<SavedDownload, ExportError>;
}
