//! Error types for tabslab.

/// Errors that can occur while configuring or running a chunker.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// Overlap must be strictly smaller than the chunk size.
    #[error("overlap {overlap} must be smaller than chunk size {size}")]
    OverlapExceedsSize {
        /// The chunk size.
        size: usize,
        /// The overlap that was too large.
        overlap: usize,
    },

    /// The document text could not be used as input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A caption detection pattern failed to compile.
    #[error("invalid detection pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type for tabslab operations.
pub type Result<T> = std::result::Result<T, Error>;
