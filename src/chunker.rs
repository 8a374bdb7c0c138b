//! Table-aware chunking.
//!
//! ## The Problem
//!
//! A recursive splitter treats a rate table like any other text. With
//! `chunk_size = 1000` a fee schedule that straddles a boundary ends up as
//!
//! ```text
//! Chunk 7:  "... | Wire transfer (domestic) | $25.00 |\n| Wire transfer"
//! Chunk 8:  "(international) | $45.00 |\n| Stop payment | $30.00 | ..."
//! ```
//!
//! and neither chunk can answer "what does an international wire cost?".
//!
//! ## The Pipeline
//!
//! ```text
//! text ──detect──> seeds ──expand──> regions ──merge──> disjoint regions
//!
//! emit:  [prose][TABLE][prose][TABLE][prose]
//!          │       │      │
//!          │       │      └─ recursive split
//!          │       └─ one chunk: context + [TABLE: h] + raw + [END TABLE] + context
//!          └─ recursive split
//! ```
//!
//! Each table becomes exactly one chunk, however long, wrapped with up to
//! `context_chars` characters of the prose on either side so the retrieved
//! chunk still says what the numbers mean. Documents with no tables take
//! the fast path: the output is exactly [`split_plain`](crate::split_plain).

use std::ops::Range;

use crate::detect::{default_rules, DetectionRule};
use crate::recursive::{RecursiveSplitter, DEFAULT_SEPARATORS};
use crate::table::{detect_regions, TableRegion};
use crate::{Chunk, ChunkConfig, Chunker, Error, Result};

/// Chunker that keeps tables intact and splits the prose around them.
///
/// ## Example
///
/// ```rust
/// use tabslab::{ChunkConfig, Chunker, TableAwareChunker};
///
/// let chunker = TableAwareChunker::new(ChunkConfig::default()).unwrap();
/// let text = "Intro paragraph.\n\n\
///             Table 2.1\n\
///             | Rate | Term |\n\
///             |------|------|\n\
///             | 3.5% | 30yr |\n\n\
///             Closing paragraph.";
/// let chunks = chunker.chunk(text);
///
/// assert_eq!(chunks.len(), 3);
/// assert_eq!(chunks[0].content, "Intro paragraph.");
/// assert!(chunks[1].is_table());
/// assert!(chunks[1].header().unwrap().contains("Table 2.1"));
/// assert_eq!(chunks[2].content, "Closing paragraph.");
/// ```
#[derive(Debug, Clone)]
pub struct TableAwareChunker {
    config: ChunkConfig,
    rules: Vec<DetectionRule>,
    splitter: RecursiveSplitter,
}

impl TableAwareChunker {
    /// Create a chunker with the built-in detection rules.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error.
    pub fn new(config: ChunkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: ChunkConfig) -> Self {
        Self {
            config,
            rules: default_rules(),
            splitter: RecursiveSplitter::new(
                config.chunk_size,
                config.chunk_overlap,
                &DEFAULT_SEPARATORS,
            ),
        }
    }

    /// Replace the detection rules.
    ///
    /// An empty rule set disables table detection entirely.
    #[must_use]
    pub fn with_rules(self, rules: Vec<DetectionRule>) -> Self {
        Self { rules, ..self }
    }

    /// Add a rule to the current set.
    #[must_use]
    pub fn with_rule(mut self, rule: DetectionRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// The merged table regions of `text`, sorted and disjoint.
    pub fn regions(&self, text: &str) -> Vec<TableRegion> {
        detect_regions(text, &self.rules, self.config.merge_tolerance)
    }

    /// Chunk raw extracted bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `bytes` is not valid UTF-8.
    pub fn chunk_bytes(&self, bytes: &[u8]) -> Result<Vec<Chunk>> {
        let text = std::str::from_utf8(bytes).map_err(|e| Error::InvalidInput(e.to_string()))?;
        Ok(self.chunk(text))
    }

    fn push_prose(&self, text: &str, range: Range<usize>, chunks: &mut Vec<Chunk>) {
        for span in self.splitter.split_range(text, range) {
            let index = chunks.len();
            chunks.push(Chunk::text(&text[span.clone()], span.start, span.end, index));
        }
    }

    fn table_chunk(&self, text: &str, region: &TableRegion, index: usize) -> Chunk {
        let header = region.header();
        let table = &text[region.span()];
        let before = last_chars(&text[..region.start], self.config.context_chars).trim();
        let after = first_chars(&text[region.end..], self.config.context_chars).trim();

        let mut content = String::with_capacity(before.len() + table.len() + after.len() + header.len() + 32);
        if !before.is_empty() {
            content.push_str(before);
            content.push('\n');
        }
        content.push_str("[TABLE: ");
        content.push_str(&header);
        content.push_str("]\n");
        content.push_str(table);
        content.push_str("\n[END TABLE]");
        if !after.is_empty() {
            content.push('\n');
            content.push_str(after);
        }

        tracing::trace!(
            index,
            start = region.start,
            end = region.end,
            header = %header,
            "emitting table chunk"
        );

        Chunk::table(content, header, table, region.span(), index)
    }
}

impl Default for TableAwareChunker {
    fn default() -> Self {
        Self::from_valid(ChunkConfig::default())
    }
}

impl Chunker for TableAwareChunker {
    fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return vec![];
        }

        let regions = self.regions(text);
        if regions.is_empty() {
            tracing::debug!(len = text.len(), "no table regions, splitting as plain text");
            return self.splitter.chunk(text);
        }

        let mut chunks = Vec::with_capacity(self.estimate_chunks(text.len()) + regions.len());
        let mut cursor = 0;

        for region in &regions {
            self.push_prose(text, cursor..region.start, &mut chunks);
            let index = chunks.len();
            chunks.push(self.table_chunk(text, region, index));
            cursor = region.end;
        }
        self.push_prose(text, cursor..text.len(), &mut chunks);

        tracing::debug!(
            len = text.len(),
            tables = regions.len(),
            chunks = chunks.len(),
            "chunked document"
        );

        chunks
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        self.splitter.estimate_chunks(text_len)
    }
}

/// The last `n` characters of `s`.
fn last_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((i, _)) => &s[i..],
        None => s,
    }
}

/// The first `n` characters of `s`.
fn first_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
