//! Table regions: expanding seeds to whole tables and merging neighbors.
//!
//! ## Expansion
//!
//! A seed marks one line. The region grows line by line in both directions
//! while the neighboring line still looks like a table line:
//!
//! ```text
//! Rates effective 1 March.       <- prose, stop
//! | Term   | Rate  |             <- table line, include
//! |--------|-------|             <- seed (separator row)
//! | 15yr   | 3.1%  |             <- table line, include
//! | 30yr   | 3.5%  |             <- table line, include
//!                                <- blank, stop
//! ```
//!
//! So one matching row is enough to recover the whole table.
//!
//! ## Merging
//!
//! Captions are usually not table lines, so `Table 2.1` and the rows below
//! it expand to separate regions. Regions whose gap is at most the merge
//! tolerance (in characters) collapse into one, keeping every distinct header:
//!
//! ```text
//! [Table 2.1]  gap=1  [| Term | Rate | ...]   ->  [Table 2.1 ... 3.5% |]
//!                                                 header "Table 2.1, | Term | Rate |"
//! ```
//!
//! After merging, regions are sorted by `start` and pairwise disjoint.

use std::ops::Range;

use crate::detect::{is_separator_row, is_table_line, DetectionRule, Seed};

/// A detected table span in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRegion {
    /// Byte offset of the start of the region's first line.
    pub start: usize,
    /// Byte offset of the end of the region's last line, before its terminator.
    pub end: usize,
    headers: Vec<String>,
}

impl TableRegion {
    /// Create a region with a single header.
    #[must_use]
    pub fn new(start: usize, end: usize, header: impl Into<String>) -> Self {
        Self {
            start,
            end,
            headers: vec![header.into()],
        }
    }

    /// The structural markers of this region, comma-joined.
    #[must_use]
    pub fn header(&self) -> String {
        self.headers.join(", ")
    }

    /// The distinct markers of this region in source order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The byte span of this region.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    fn absorb(&mut self, other: Self) {
        self.end = self.end.max(other.end);
        for header in other.headers {
            if !self.headers.contains(&header) {
                self.headers.push(header);
            }
        }
    }
}

/// Merge regions whose gap is at most `tolerance` characters of `text`.
///
/// Overlapping regions always merge. The input is left untouched; the
/// result is sorted by `start` and pairwise disjoint.
///
/// ```rust
/// use tabslab::{merge_regions, TableRegion};
///
/// let text = "x".repeat(140);
/// let regions = [
///     TableRegion::new(100, 140, "Schedule A"),
///     TableRegion::new(0, 30, "Table 1.1"),
///     TableRegion::new(35, 80, "| A | B |"),
/// ];
/// let merged = merge_regions(&text, &regions, 50);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].header(), "Table 1.1, | A | B |, Schedule A");
///
/// assert_eq!(merge_regions(&text, &regions, 10).len(), 2);
/// ```
#[must_use]
pub fn merge_regions(text: &str, regions: &[TableRegion], tolerance: usize) -> Vec<TableRegion> {
    let mut sorted = regions.to_vec();
    sorted.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<TableRegion> = Vec::with_capacity(sorted.len());
    for region in sorted {
        match merged.last_mut() {
            Some(prev) if gap_chars(text, prev.end, region.start) <= tolerance => prev.absorb(region),
            _ => merged.push(region),
        }
    }
    merged
}

/// Characters between `end` and `start`; zero when the spans overlap.
/// A span that does not fit `text` never merges.
fn gap_chars(text: &str, end: usize, start: usize) -> usize {
    if start <= end {
        return 0;
    }
    text.get(end..start)
        .map_or(usize::MAX, |gap| gap.chars().count())
}

/// Detect, expand and merge the table regions of `text`.
pub fn detect_regions(text: &str, rules: &[DetectionRule], tolerance: usize) -> Vec<TableRegion> {
    if text.is_empty() {
        return vec![];
    }

    let mut seeds: Vec<Seed> = rules.iter().flat_map(|rule| rule.find_seeds(text)).collect();
    if seeds.is_empty() {
        return vec![];
    }
    seeds.sort_by_key(|s| s.offset);

    let lines = LineIndex::new(text);
    let mut regions = Vec::new();
    // Rows of one table all expand to the same block; expand it once.
    let mut last_block: Option<Range<usize>> = None;

    for seed in seeds {
        let line = lines.line_of(seed.offset);
        if seed.header.is_none() && last_block.as_ref().is_some_and(|b| b.contains(&line)) {
            continue;
        }

        let block = lines.expand(text, line);
        let header = match seed.header {
            Some(caption) => caption,
            None => {
                last_block = Some(block.clone());
                lines.header_row(text, block.clone())
            }
        };

        regions.push(TableRegion::new(
            lines.spans[block.start].start,
            lines.spans[block.end - 1].end,
            header,
        ));
    }

    merge_regions(text, &regions, tolerance)
}

/// Line spans of a text, excluding `\n` / `\r\n` terminators.
struct LineIndex {
    spans: Vec<Range<usize>>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut spans = Vec::new();
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            let content = line.trim_end_matches(['\n', '\r']);
            spans.push(offset..offset + content.len());
            offset += line.len();
        }
        Self { spans }
    }

    /// Index of the line containing byte `offset`.
    fn line_of(&self, offset: usize) -> usize {
        self.spans
            .partition_point(|span| span.start <= offset)
            .saturating_sub(1)
    }

    fn is_table(&self, text: &str, line: usize) -> bool {
        is_table_line(&text[self.spans[line].clone()])
    }

    /// Grow `line` to the maximal run of table lines around it.
    /// Returns a half-open range of line indices.
    fn expand(&self, text: &str, line: usize) -> Range<usize> {
        let mut first = line;
        while first > 0 && self.is_table(text, first - 1) {
            first -= 1;
        }
        let mut last = line;
        while last + 1 < self.spans.len() && self.is_table(text, last + 1) {
            last += 1;
        }
        first..last + 1
    }

    /// First line of a block that is not a bare separator, trimmed.
    fn header_row(&self, text: &str, block: Range<usize>) -> String {
        let mut rows = block.map(|i| text[self.spans[i].clone()].trim());
        let first = rows.clone().next().unwrap_or_default();
        rows.find(|row| !is_separator_row(row))
            .unwrap_or(first)
            .to_string()
    }
}
