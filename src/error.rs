use std::path::PathBuf;

use thiserror::Error;

/// Failures at the edges: reading pages and config, decoding JSON.
/// Building and resolving never fail.
#[derive(Debug, Error)]
pub enum TocError {
    #[error("{}: not found", path.display())]
    NotFound { path: PathBuf },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid page description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl TocError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}
