use std::path::PathBuf;

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors outside of directory scanning (terminal, log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A directory could not be listed: unreadable, permission denied, or gone.
    #[error("cannot scan {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Expand was requested on something that is not a directory node.
    #[error("not an expandable directory: {}", .0.display())]
    InvalidExpandTarget(PathBuf),

    /// Expand target is not part of the current tree.
    #[error("no such node in tree: {}", .0.display())]
    NodeNotFound(PathBuf),

    /// Malformed exclusion glob.
    #[error("invalid exclude pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl AppError {
    /// Wrap an I/O error raised while listing `path`.
    pub fn scan(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Scan {
            path: path.into(),
            source,
        }
    }
}
