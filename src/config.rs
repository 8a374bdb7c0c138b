//! Chunking configuration.
//!
//! ## The Knobs
//!
//! Only two values shape prose chunks:
//!
//! - `chunk_size`: target characters per text chunk (a hard ceiling for prose)
//! - `chunk_overlap`: characters carried over between adjacent text chunks
//!
//! Two more shape table chunks:
//!
//! - `context_chars`: prose kept on each side of a table so a retrieved table
//!   still says what it is about
//! - `merge_tolerance`: largest gap (in characters) between two detected regions
//!   that still collapses them into one table, so a caption separated from
//!   its body by a short line stays attached
//!
//! ```text
//! Table 2.1  Fixed mortgage rates          <- caption region
//! Rates effective 1 March.                 <- 25-char gap, below tolerance
//! | Term | Rate |                          <- body region
//! |------|------|
//! ```
//!
//! Defaults (1000 / 200 / 200 / 50) suit the density of banking documents:
//! long prose sections punctuated by small, number-heavy tables.

use serde::Deserialize;

use crate::{Error, Result};

/// Default target characters per text chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default overlap between adjacent text chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
/// Default characters of surrounding prose kept with a table.
pub const DEFAULT_CONTEXT_CHARS: usize = 200;
/// Default largest gap between regions that still merge.
pub const DEFAULT_MERGE_TOLERANCE: usize = 50;

/// Chunking configuration.
///
/// Deserializes from the JSON the upload service sends; absent fields fall
/// back to defaults and the camelCase names are accepted.
///
/// # Examples
///
/// ```rust
/// use tabslab::ChunkConfig;
///
/// let config = ChunkConfig::default();
/// assert_eq!(config.chunk_size, 1000);
/// assert_eq!(config.chunk_overlap, 200);
///
/// let config = ChunkConfig::new(500, 50).with_context_chars(100);
/// assert!(config.validate().is_ok());
///
/// assert!(ChunkConfig::new(100, 100).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Target characters per text chunk.
    #[serde(alias = "chunkSize")]
    pub chunk_size: usize,
    /// Characters of overlap between adjacent text chunks.
    #[serde(alias = "chunkOverlap")]
    pub chunk_overlap: usize,
    /// Characters of prose kept before and after each table.
    #[serde(alias = "contextChars")]
    pub context_chars: usize,
    /// Largest gap in characters between two regions that still merge.
    #[serde(alias = "mergeTolerance")]
    pub merge_tolerance: usize,
}

impl ChunkConfig {
    /// Create a config with the given size and overlap and default table settings.
    #[must_use]
    pub const fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            context_chars: DEFAULT_CONTEXT_CHARS,
            merge_tolerance: DEFAULT_MERGE_TOLERANCE,
        }
    }

    /// Set the characters of context kept around each table.
    #[must_use]
    pub const fn with_context_chars(self, context_chars: usize) -> Self {
        Self {
            context_chars,
            ..self
        }
    }

    /// Set the merge tolerance between detected regions.
    #[must_use]
    pub const fn with_merge_tolerance(self, merge_tolerance: usize) -> Self {
        Self {
            merge_tolerance,
            ..self
        }
    }

    /// Check that the config can drive a splitter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if `chunk_size == 0` and
    /// [`Error::OverlapExceedsSize`] if `chunk_overlap >= chunk_size`.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidChunkSize(self.chunk_size));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::OverlapExceedsSize {
                size: self.chunk_size,
                overlap: self.chunk_overlap,
            });
        }
        Ok(())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl From<(usize, usize)> for ChunkConfig {
    fn from((chunk_size, chunk_overlap): (usize, usize)) -> Self {
        Self::new(chunk_size, chunk_overlap)
    }
}
