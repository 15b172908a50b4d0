//! Error kinds surfaced by the content pipeline

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures of the post pipeline, one variant per kind the page layer
/// distinguishes
#[derive(Error, Debug)]
pub enum BlogError {
    #[error("malformed front-matter: {message}")]
    Parse { message: String },

    #[error("failed to read content directory {}: {source}", .path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read post {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("post not found: {slug}")]
    NotFound { slug: String },
}

impl BlogError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(slug: &str) -> Self {
        Self::NotFound {
            slug: slug.to_string(),
        }
    }

    /// Prefix a parse error with the file it came from
    pub(crate) fn in_file(self, path: &Path) -> Self {
        match self {
            Self::Parse { message } => Self::Parse {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        }
    }

    /// Whether the page layer should answer this with "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Parse { .. })
    }
}
