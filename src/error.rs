//! Error types for the rssa crate
//!
//! Every failure in the core is fatal and surfaces to the immediate caller.
//! Nothing is retried, and no partially decoded file or half-filled grid is
//! ever returned.

// external crates
use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, RssaError>;

/// All the ways reading or binning an RSSA file can fail
///
/// The split matters to callers: [RssaError::Format] means the file is
/// corrupt, [RssaError::UnsupportedFormat] means it is a valid file this
/// reader does not understand, and the remaining variants are caller errors
/// raised before any computation is done.
#[derive(Error, Debug)]
pub enum RssaError {
    /// Broken record framing or truncated track data
    #[error("Malformed RSSA data: {0}")]
    Format(String),

    /// Valid framing but a layout this reader does not implement
    #[error("Unsupported RSSA format: {0}")]
    UnsupportedFormat(String),

    /// Caller supplied an argument outside the accepted values
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A filter combination left no tracks to work with
    #[error("Empty selection: {0}")]
    EmptySelection(String),

    /// Underlying file IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
