//! Recursive character splitting for prose.
//!
//! Tries progressively finer separators until pieces fit, then packs pieces
//! greedily into chunks with overlap.
//!
//! ## The Algorithm
//!
//! Given separators `["\n\n", "\n", " ", ""]`, `chunk_size = 100` and
//! `chunk_overlap = 20`:
//!
//! ```text
//! 1. Pick the first separator that occurs in the text (say "\n\n")
//! 2. Split on it, keeping the separator at the front of the next piece
//! 3. Pieces shorter than 100 chars are packed left to right:
//!      [p1 p2 p3] full -> emit, drop p1.. until <= 20 chars remain
//!      [p3 p4 p5] full -> emit, ...
//! 4. A piece of 100+ chars is split again with the remaining separators
//!    ("\n", then " ", then "" = grapheme clusters)
//! ```
//!
//! A custom separator list need not end in `""`: a piece that is still too
//! long after the last separator is force-split on grapheme clusters.
//!
//! The trailing pieces kept after an emit are the overlap: they start the
//! next chunk, so text near a boundary appears in both neighbors.
//!
//! ## Spans, Not Strings
//!
//! Pieces are byte ranges into the source text. Because a separator stays
//! attached to its piece, consecutive pieces are contiguous and a packed
//! chunk is always one slice of the original. Each chunk is trimmed of
//! surrounding whitespace; whitespace-only chunks are dropped.
//!
//! ## Length
//!
//! Sizes count Unicode scalar values, not bytes, so `chunk_size = 1000`
//! means the same thing for "12.5%" and "€12,50".

use std::collections::VecDeque;
use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::{Chunk, ChunkConfig, Chunker, Result};

/// Separators from coarsest to finest: paragraph, line, word, character.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Recursive character splitter with overlap.
///
/// ## Example
///
/// ```rust
/// use tabslab::{Chunker, RecursiveSplitter};
///
/// let splitter = RecursiveSplitter::new(40, 10, &["\n\n", "\n", " ", ""]);
/// let text = "Savings accounts.\n\nCurrent accounts pay no interest on balances.";
/// let chunks = splitter.chunk(text);
///
/// assert_eq!(chunks[0].content, "Savings accounts.");
/// assert!(chunks.iter().all(|c| c.len() <= 40));
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveSplitter {
    /// Create a new recursive splitter.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - Maximum chunk length in characters
    /// * `chunk_overlap` - Characters carried into the next chunk
    /// * `separators` - Hierarchy of separators, coarsest first
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size == 0`, `chunk_overlap >= chunk_size`, or
    /// `separators` is empty.
    #[must_use]
    pub fn new(chunk_size: usize, chunk_overlap: usize, separators: &[&str]) -> Self {
        assert!(chunk_size > 0, "chunk_size must be > 0");
        assert!(chunk_overlap < chunk_size, "chunk_overlap must be < chunk_size");
        assert!(!separators.is_empty(), "separators must not be empty");

        Self {
            chunk_size,
            chunk_overlap,
            separators: separators.iter().map(|&s| s.to_string()).collect(),
        }
    }

    /// Create a splitter with the default separators from a config.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error.
    pub fn from_config(config: &ChunkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.chunk_size,
            config.chunk_overlap,
            &DEFAULT_SEPARATORS,
        ))
    }

    /// Split `text[range]` into trimmed, non-empty chunk spans of `text`.
    pub(crate) fn split_range(&self, text: &str, range: Range<usize>) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        if range.is_empty() {
            return spans;
        }
        self.split_recursive(text, range, &self.separators, &mut spans);
        spans
    }

    fn split_recursive(
        &self,
        text: &str,
        range: Range<usize>,
        separators: &[String],
        out: &mut Vec<Range<usize>>,
    ) {
        let slice = &text[range.clone()];

        // First separator present in the text; the last one is the fallback.
        let sep_index = separators
            .iter()
            .position(|s| s.is_empty() || slice.contains(s.as_str()))
            .unwrap_or(separators.len() - 1);
        let separator = &separators[sep_index];
        let finer = &separators[sep_index + 1..];

        let mut fitting: Vec<Range<usize>> = Vec::new();

        for piece in split_keeping_separator(text, range, separator) {
            if char_len(text, &piece) < self.chunk_size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                self.merge_pieces(text, &fitting, out);
                fitting.clear();
            }

            if finer.is_empty() {
                self.force_split(text, piece, out);
            } else {
                self.split_recursive(text, piece, finer, out);
            }
        }

        if !fitting.is_empty() {
            self.merge_pieces(text, &fitting, out);
        }
    }

    /// Last resort once the separators run out: pack grapheme clusters, so
    /// custom separator lists without `""` still respect `chunk_size`.
    fn force_split(&self, text: &str, range: Range<usize>, out: &mut Vec<Range<usize>>) {
        let graphemes = split_keeping_separator(text, range, "");
        self.merge_pieces(text, &graphemes, out);
    }

    /// Pack contiguous pieces into chunks, keeping up to `chunk_overlap`
    /// characters of trailing pieces at the start of the next chunk.
    fn merge_pieces(&self, text: &str, pieces: &[Range<usize>], out: &mut Vec<Range<usize>>) {
        let mut window: VecDeque<(Range<usize>, usize)> = VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            let len = char_len(text, piece);

            if total + len > self.chunk_size {
                if let (Some((first, _)), Some((last, _))) = (window.front(), window.back()) {
                    push_trimmed(text, first.start..last.end, out);
                }

                while total > self.chunk_overlap || (total > 0 && total + len > self.chunk_size) {
                    match window.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }

            window.push_back((piece.clone(), len));
            total += len;
        }

        if let (Some((first, _)), Some((last, _))) = (window.front(), window.back()) {
            push_trimmed(text, first.start..last.end, out);
        }
    }
}

impl Chunker for RecursiveSplitter {
    fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return vec![];
        }

        self.split_range(text, 0..text.len())
            .into_iter()
            .enumerate()
            .map(|(index, span)| Chunk::text(&text[span.clone()], span.start, span.end, index))
            .collect()
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        let step = self.chunk_size - self.chunk_overlap;
        text_len.div_ceil(step).max(1)
    }
}

/// Split plain text with the default separators.
///
/// This is the prose path of the table-aware chunker, and the whole of its
/// output when a document has no tables.
///
/// ```rust
/// use tabslab::{split_plain, ChunkConfig};
///
/// let chunks = split_plain("One.\n\nTwo.", &ChunkConfig::new(5, 0))?;
/// assert_eq!(chunks.len(), 2);
/// # Ok::<(), tabslab::Error>(())
/// ```
///
/// # Errors
///
/// Returns the config's validation error.
pub fn split_plain(text: &str, config: &ChunkConfig) -> Result<Vec<Chunk>> {
    Ok(RecursiveSplitter::from_config(config)?.chunk(text))
}

/// Split `text[range]` on `separator`, attaching each separator occurrence to
/// the piece that follows it. The empty separator splits into grapheme clusters.
fn split_keeping_separator(text: &str, range: Range<usize>, separator: &str) -> Vec<Range<usize>> {
    let base = range.start;
    let slice = &text[range.clone()];

    if separator.is_empty() {
        return slice
            .grapheme_indices(true)
            .map(|(i, g)| base + i..base + i + g.len())
            .collect();
    }

    let mut pieces = Vec::new();
    let mut piece_start = base;
    for (i, _) in slice.match_indices(separator) {
        let at = base + i;
        if at > piece_start {
            pieces.push(piece_start..at);
        }
        piece_start = at;
    }
    if piece_start < range.end {
        pieces.push(piece_start..range.end);
    }
    pieces
}

fn char_len(text: &str, range: &Range<usize>) -> usize {
    text[range.clone()].chars().count()
}

fn push_trimmed(text: &str, range: Range<usize>, out: &mut Vec<Range<usize>>) {
    let slice = &text[range.clone()];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let leading = slice.len() - slice.trim_start().len();
    let start = range.start + leading;
    out.push(start..start + trimmed.len());
}
