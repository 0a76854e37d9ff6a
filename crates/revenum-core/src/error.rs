//! Error types for the revenum-core library.
//!
//! Reading the artifact is the only operation that can fail. Everything after
//! that point is infallible: malformed or unbalanced enumerations degrade into
//! a shorter model list instead of an error.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for revenum operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all revenum operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read the input artifact
    #[error("failed to read artifact '{path}': {source}")]
    FileRead {
        /// Path to the artifact that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }
}
