//! Property-based tests for table-aware chunking.
//!
//! These tests verify that chunking maintains key invariants:
//! - Ordered: chunks are in source order with sequential indices
//! - Bounds: spans are valid and text chunks match their source
//! - Atomicity: every table lands whole in exactly one chunk
//! - Fallback: table-free input is split exactly like `split_plain`

use proptest::prelude::*;
use tabslab::{
    default_rules, detect_regions, split_plain, Chunk, ChunkConfig, Chunker, TableAwareChunker,
};

// =============================================================================
// Test Generators
// =============================================================================

/// Prose without any table signal: no pipes, dashes, or caption keywords.
fn prose() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::string::string_regex("[a-z]{1,12}").unwrap(), 1..60).prop_map(
        |words| {
            let mut text = String::new();
            for (i, word) in words.iter().enumerate() {
                text.push_str(word);
                text.push_str(match i % 11 {
                    10 => ".\n\n",
                    6 => ".\n",
                    _ => " ",
                });
            }
            text
        },
    )
}

/// A pipe table, optionally captioned.
fn table() -> impl Strategy<Value = String> {
    (
        prop::option::of(1u32..9),
        prop::collection::vec(prop::string::string_regex("[0-9]{1,3}\\.[0-9]{2}%").unwrap(), 1..8),
    )
        .prop_map(|(caption, cells)| {
            let mut text = String::new();
            if let Some(n) = caption {
                text.push_str(&format!("Table {n}.1 Rates\n"));
            }
            text.push_str("| Term | Rate |\n|------|------|\n");
            for (i, cell) in cells.iter().enumerate() {
                text.push_str(&format!("| {}yr | {cell} |\n", i + 1));
            }
            text
        })
}

/// A document alternating prose and tables, each table separated from the
/// next by more than the merge tolerance.
fn document() -> impl Strategy<Value = String> {
    prop::collection::vec((prose(), table()), 0..4).prop_flat_map(|parts| {
        prose().prop_map(move |tail| {
            let mut text = String::new();
            for (p, t) in &parts {
                text.push_str(p);
                text.push_str(&"x".repeat(60));
                text.push_str("\n\n");
                text.push_str(t);
                text.push('\n');
            }
            text.push_str(&tail);
            text
        })
    })
}

fn config() -> impl Strategy<Value = ChunkConfig> {
    (20usize..300, 0usize..19).prop_map(|(size, overlap)| ChunkConfig::new(size, overlap))
}

// =============================================================================
// Invariant Helpers
// =============================================================================

fn ordered(chunks: &[Chunk]) -> bool {
    chunks.iter().enumerate().all(|(i, c)| c.index == i)
        && chunks.windows(2).all(|w| w[0].start <= w[1].start)
}

fn bounds_valid(chunks: &[Chunk], text: &str) -> bool {
    chunks.iter().all(|c| {
        c.start <= c.end
            && c.end <= text.len()
            && (c.is_table() || text[c.span()] == c.content)
    })
}

/// Every non-whitespace byte of the source is inside some chunk's span.
fn covers_source(chunks: &[Chunk], text: &str) -> bool {
    text.char_indices()
        .filter(|(_, ch)| !ch.is_whitespace())
        .all(|(i, _)| chunks.iter().any(|c| c.span().contains(&i)))
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn chunks_ordered(text in document(), config in config()) {
        let chunks = TableAwareChunker::new(config).unwrap().chunk(&text);
        prop_assert!(ordered(&chunks));
    }

    #[test]
    fn chunk_bounds_valid(text in document(), config in config()) {
        let chunks = TableAwareChunker::new(config).unwrap().chunk(&text);
        prop_assert!(bounds_valid(&chunks, &text));
    }

    #[test]
    fn nothing_dropped(text in document(), config in config()) {
        let chunks = TableAwareChunker::new(config).unwrap().chunk(&text);
        prop_assert!(covers_source(&chunks, &text));
    }

    #[test]
    fn text_chunks_respect_size(text in document(), config in config()) {
        let chunks = TableAwareChunker::new(config).unwrap().chunk(&text);
        for chunk in chunks.iter().filter(|c| !c.is_table()) {
            prop_assert!(chunk.len() <= config.chunk_size, "{} > {}", chunk.len(), config.chunk_size);
        }
    }

    #[test]
    fn tables_are_atomic(parts in prop::collection::vec((prose(), table()), 1..4), config in config()) {
        let mut text = String::new();
        for (p, t) in &parts {
            text.push_str(p);
            text.push_str(&"x".repeat(60));
            text.push_str("\n\n");
            text.push_str(t);
            text.push('\n');
        }

        let chunks = TableAwareChunker::new(config).unwrap().chunk(&text);
        let tables: Vec<&Chunk> = chunks.iter().filter(|c| c.is_table()).collect();
        prop_assert_eq!(tables.len(), parts.len());

        for ((_, t), chunk) in parts.iter().zip(&tables) {
            prop_assert_eq!(chunk.table_content().unwrap(), t.trim_end());
            prop_assert!(chunk.content.contains(t.trim_end()));
        }
    }

    #[test]
    fn no_tables_matches_plain_split(text in prose(), config in config()) {
        let chunks = TableAwareChunker::new(config).unwrap().chunk(&text);
        prop_assert_eq!(chunks, split_plain(&text, &config).unwrap());
    }

    #[test]
    fn redetecting_table_content_is_stable(text in document()) {
        let chunks = TableAwareChunker::default().chunk(&text);
        for chunk in chunks.iter().filter(|c| c.is_table()) {
            let raw = chunk.table_content().unwrap();
            let regions = detect_regions(raw, &default_rules(), 50);
            prop_assert_eq!(regions.len(), 1);
            prop_assert_eq!(regions[0].span(), 0..raw.len());
        }
    }

    #[test]
    fn arbitrary_text_never_panics(text in ".{0,400}", config in config()) {
        let chunks = TableAwareChunker::new(config).unwrap().chunk(&text);
        prop_assert!(ordered(&chunks));
        prop_assert!(bounds_valid(&chunks, &text));
    }
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn empty_input_produces_empty_output() {
    let chunker = TableAwareChunker::default();
    assert!(chunker.chunk("").is_empty());
    assert!(split_plain("", &ChunkConfig::default()).unwrap().is_empty());
}

#[test]
fn chunking_is_deterministic() {
    let text = "Intro.\n\nExhibit 2\n| a | b |\n| 1 | 2 |\n\nOutro.";
    let chunker = TableAwareChunker::default();
    assert_eq!(chunker.chunk(text), chunker.chunk(text));
}
