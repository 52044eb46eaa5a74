use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("deployment manifest {} does not exist", path.display())]
    MissingManifestFile { path: PathBuf },

    #[error("failed to access manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid address for {field}: {reason}")]
    InvalidAddress { field: String, reason: String },
}

impl ManifestError {
    pub(crate) fn invalid_address(field: &str, reason: impl ToString) -> Self {
        ManifestError::InvalidAddress {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}
