use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while collecting model sources from disk.
///
/// Text extraction itself never fails; only the filesystem boundary does.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The configured models directory does not exist.
    #[error("models directory not found: {}", path.display())]
    ModelsDirNotFound { path: PathBuf },

    /// Reading a directory entry or file failed.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed.
    #[error("failed to walk models directory")]
    Walk(#[from] walkdir::Error),
}

impl ScanError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A method name that is not one of `hasMany`, `belongsTo`, `hasOne`, `belongsToMany`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown association kind: {0}")]
pub struct UnknownAssociationKind(pub String);
