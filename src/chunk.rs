//! The Chunk type: a retrieval unit with its kind and source position.

use serde::Serialize;

/// Whether a chunk carries prose or a preserved table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    /// Prose produced by the recursive splitter.
    Text,
    /// A table kept intact, wrapped in markers and context.
    Table,
}

/// Metadata stored alongside a chunk's embedding.
///
/// Serializes to the shape the storage layer persists:
///
/// ```text
/// {"type": "table", "header": "Table 2.1", "tableContent": "| Rate | Term |\n..."}
/// {"type": "text"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    /// Chunk kind.
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    /// The structural marker(s) that identified the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// The raw table text, without markers or context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_content: Option<String>,
}

/// A chunk of a document, ready to embed.
///
/// ## Offsets
///
/// `start` and `end` are byte offsets into the original text. For a text
/// chunk, `content` is exactly `text[start..end]`:
///
/// ```rust
/// use tabslab::Chunk;
///
/// let text = "Deposit rates rose.";
/// let chunk = Chunk::text("rates", 8, 13, 0);
/// assert_eq!(&text[chunk.span()], chunk.content);
/// ```
///
/// For a table chunk the span covers the raw table only; `content` adds the
/// `[TABLE: ..]` / `[END TABLE]` markers and surrounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// The text that gets embedded.
    pub content: String,
    /// Kind, header and raw table text.
    pub metadata: ChunkMetadata,
    /// Byte offset where the source span starts.
    pub start: usize,
    /// Byte offset where the source span ends (exclusive).
    pub end: usize,
    /// Zero-based position of this chunk in the document's sequence.
    pub index: usize,
}

impl Chunk {
    /// Create a prose chunk.
    #[must_use]
    pub fn text(content: impl Into<String>, start: usize, end: usize, index: usize) -> Self {
        Self {
            content: content.into(),
            metadata: ChunkMetadata {
                kind: ChunkKind::Text,
                header: None,
                table_content: None,
            },
            start,
            end,
            index,
        }
    }

    /// Create a table chunk.
    #[must_use]
    pub fn table(
        content: impl Into<String>,
        header: impl Into<String>,
        table_content: impl Into<String>,
        span: std::ops::Range<usize>,
        index: usize,
    ) -> Self {
        Self {
            content: content.into(),
            metadata: ChunkMetadata {
                kind: ChunkKind::Table,
                header: Some(header.into()),
                table_content: Some(table_content.into()),
            },
            start: span.start,
            end: span.end,
            index,
        }
    }

    /// Whether this chunk holds a preserved table.
    #[must_use]
    pub fn is_table(&self) -> bool {
        self.metadata.kind == ChunkKind::Table
    }

    /// The table header, if this is a table chunk.
    #[must_use]
    pub fn header(&self) -> Option<&str> {
        self.metadata.header.as_deref()
    }

    /// The raw table text, if this is a table chunk.
    #[must_use]
    pub fn table_content(&self) -> Option<&str> {
        self.metadata.table_content.as_deref()
    }

    /// The length of `content` in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    /// Whether `content` is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// The byte span of this chunk in the original document.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.metadata.kind {
            ChunkKind::Text => "text",
            ChunkKind::Table => "table",
        };
        write!(
            f,
            "Chunk {{ index: {}, type: {}, span: {}..{}, len: {} }}",
            self.index,
            kind,
            self.start,
            self.end,
            self.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_chunk() {
        let chunk = Chunk::text("hello", 0, 5, 0);
        assert!(!chunk.is_table());
        assert_eq!(chunk.header(), None);
        assert_eq!(chunk.len(), 5);
        assert_eq!(chunk.span(), 0..5);
    }

    #[test]
    fn test_len_counts_chars() {
        let chunk = Chunk::text("€100", 0, 6, 0);
        assert_eq!(chunk.len(), 4);
    }

    #[test]
    fn test_display() {
        let chunk = Chunk::table("x", "Table 1.1", "|a|", 3..6, 2);
        assert_eq!(
            chunk.to_string(),
            "Chunk { index: 2, type: table, span: 3..6, len: 1 }"
        );
    }
}
