//! # tabslab
//!
//! Table-aware text chunking for retrieval-augmented generation (RAG) over
//! banking documents.
//!
//! ## The Problem
//!
//! Banking documents are mostly prose punctuated by small, dense tables:
//! rate sheets, fee schedules, amortization exhibits. A generic splitter
//! cuts wherever the size budget runs out, so a table often lands half in
//! one chunk and half in the next:
//!
//! ```text
//! | Term | Fixed | Variable |
//! |------|-------|----------|
//! | 15yr | 3.1%  | 2.9%     |        <- chunk 4 ends here
//! ---------------------------------
//! | 30yr | 3.5%  | 3.2%     |        <- chunk 5 starts here, no column names
//! ```
//!
//! A retriever that surfaces chunk 5 hands the model a row of bare numbers.
//!
//! ## The Approach
//!
//! 1. **Detect**: find table signals, such as captions (`Table 2.1`,
//!    `Schedule A`, `Exhibit 3`), pipe-delimited rows and `|---|` separator rows.
//! 2. **Expand**: grow each signal over the contiguous table-looking lines
//!    around it.
//! 3. **Merge**: collapse regions separated by at most 50 characters, so a caption
//!    and its body become one table.
//! 4. **Emit**: one chunk per table, wrapped in `[TABLE: ..]` / `[END TABLE]`
//!    markers with a little surrounding prose; everything else goes through
//!    a recursive splitter (paragraph → line → word → character).
//!
//! Documents without tables skip straight to the recursive splitter.
//!
//! ## Quick Start
//!
//! ```rust
//! use tabslab::{ChunkConfig, Chunker, TableAwareChunker};
//!
//! let chunker = TableAwareChunker::new(ChunkConfig::new(1000, 200))?;
//! let chunks = chunker.chunk(
//!     "Our savings rates are below.\n\n\
//!      Schedule A\n\
//!      | Balance  | APY   |\n\
//!      |----------|-------|\n\
//!      | < $10k   | 0.50% |\n\
//!      | >= $10k  | 1.25% |\n\n\
//!      Rates may change at any time.",
//! );
//!
//! let table = chunks.iter().find(|c| c.is_table()).unwrap();
//! assert!(table.table_content().unwrap().contains("| >= $10k  | 1.25% |"));
//! # Ok::<(), tabslab::Error>(())
//! ```
//!
//! ## Plain Splitting
//!
//! The prose splitter is usable on its own:
//!
//! ```rust
//! use tabslab::{split_plain, ChunkConfig};
//!
//! let chunks = split_plain("First paragraph.\n\nSecond paragraph.", &ChunkConfig::new(20, 0))?;
//! assert_eq!(chunks.len(), 2);
//! # Ok::<(), tabslab::Error>(())
//! ```
//!
//! ## Guarantees
//!
//! | Property | |
//! |----------|-|
//! | Order | chunks appear in source order, `index` = position |
//! | Atomicity | each table is in exactly one chunk |
//! | Fallback | no tables ⇒ output equals `split_plain` |
//! | Purity | no I/O, no shared state; `Send + Sync` |
//!
//! Detection is syntactic. Prose containing two pipes, or a bare `---` rule,
//! is treated as a table: kept whole, never dropped.

mod chunk;
mod chunker;
mod config;
mod detect;
mod error;
mod recursive;
mod table;

pub use chunk::{Chunk, ChunkKind, ChunkMetadata};
pub use chunker::TableAwareChunker;
pub use config::{
    ChunkConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_CONTEXT_CHARS,
    DEFAULT_MERGE_TOLERANCE,
};
pub use detect::{default_rules, is_table_line, DetectionRule, Seed};
pub use error::{Error, Result};
pub use recursive::{split_plain, RecursiveSplitter, DEFAULT_SEPARATORS};
pub use table::{detect_regions, merge_regions, TableRegion};

/// A text chunking strategy.
///
/// Both chunkers implement this trait, so callers can swap the prose-only
/// splitter for the table-aware one:
///
/// ```rust
/// use tabslab::{Chunker, RecursiveSplitter, TableAwareChunker};
///
/// fn chunk_document(chunker: &dyn Chunker, text: &str) -> Vec<tabslab::Chunk> {
///     chunker.chunk(text)
/// }
///
/// let plain = RecursiveSplitter::new(100, 20, &["\n\n", "\n", " ", ""]);
/// let tables = TableAwareChunker::default();
///
/// let text = "Fees.\n| Item | Fee |\n| Wire | $25 |";
/// assert!(chunk_document(&plain, text).iter().all(|c| !c.is_table()));
/// assert!(chunk_document(&tables, text).iter().any(|c| c.is_table()));
/// ```
pub trait Chunker: Send + Sync {
    /// Split text into chunks, in source order.
    fn chunk(&self, text: &str) -> Vec<Chunk>;

    /// Estimate the number of chunks for a given text length.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, text_len: usize) -> usize {
        // Conservative default
        (text_len / 500).max(1)
    }
}
