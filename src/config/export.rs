//! Report export configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::ports::ExportFormat;

/// Report export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory exported reports are downloaded into
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Format used when none is requested explicitly
    #[serde(default = "default_format")]
    pub default_format: ExportFormat,
}

impl ExportConfig {
    /// Validate export configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.download_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("EXPORT_DOWNLOAD_DIR"));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            default_format: default_format(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_format() -> ExportFormat {
    ExportFormat::Pdf
}
