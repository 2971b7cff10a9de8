//! Error types shared by every driver

use thiserror::Error;

/// Result type alias
pub type FsResult<T> = Result<T, FsError>;

/// Main error type
///
/// Derived operations never remap a primitive failure; whatever a driver
/// raises is what the caller sees.
#[derive(Error, Debug)]
pub enum FsError {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Directory not empty: {0}")]
    NotEmpty(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Source and destination belong to different file systems")]
    CrossFileSystem,

    #[error("File system has been disposed")]
    Disposed,

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }

    /// True for failures caused by state at the destination rather than a
    /// fault in the underlying medium.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            FsError::AlreadyExists(_) | FsError::NotEmpty(_) | FsError::CrossFileSystem
        )
    }
}
