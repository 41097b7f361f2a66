//! Error types for pageflow library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pageflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while fetching, caching, or rendering pages.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The page cache file could not be read or written.
    #[error("Cache I/O error at {}: {message}", path.display())]
    CacheIo {
        /// Cache file path
        path: PathBuf,
        /// Underlying failure
        message: String,
    },

    /// Fetching a page from the layout service failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// A batch was configured with zero concurrency slots.
    #[error("Invalid concurrency limit: {0} (must be at least 1)")]
    InvalidConcurrency(usize),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Failure of a single page fetch.
///
/// Returned by the caller-supplied fetch function; kept separate from
/// [`Error`] so fetch closures don't need the full library error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The layout service rejected or failed the request.
    #[error("layout service error: {0}")]
    Service(String),

    /// The request did not complete in time.
    #[error("layout service timed out")]
    Timeout,

    /// The service answered with something that is not a layout result.
    #[error("could not decode layout result: {0}")]
    Decode(String),

    /// The fetch function panicked.
    #[error("fetch task panicked: {0}")]
    Panicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidConcurrency(0);
        assert_eq!(
            err.to_string(),
            "Invalid concurrency limit: 0 (must be at least 1)"
        );

        let err = Error::CacheIo {
            path: PathBuf::from("/tmp/doc.json"),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cache I/O error at /tmp/doc.json: permission denied"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_fetch_error_conversion() {
        let err: Error = FetchError::Timeout.into();
        assert!(matches!(err, Error::Fetch(FetchError::Timeout)));
        assert_eq!(err.to_string(), "Fetch error: layout service timed out");
    }
}
