//! Table-signal detection rules.
//!
//! Extracted PDF and DOCX text loses its layout, but banking tables leave
//! recognisable traces:
//!
//! ```text
//! Schedule B  Account fees                 <- caption
//! | Service          | Fee    |            <- pipe-delimited row
//! |------------------|--------|            <- separator row
//! | Wire transfer    | $25.00 |
//! ```
//!
//! Each [`DetectionRule`] finds *seeds*: byte offsets where some table
//! signal was seen. Seeds are only starting points; [`crate::table`] grows
//! each one to the full extent of the table around it.
//!
//! New document conventions (say, "Annex IV") are added as extra caption
//! rules without touching expansion, merging, or emission.

use std::sync::LazyLock;

use regex::Regex;

use crate::Result;

static TABLE_CAPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bTable[ \t]+\d+\.\d+[^\r\n]*").expect("table caption pattern")
});

static SCHEDULE_CAPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bSchedule[ \t]+[A-Z]+\b[^\r\n]*").expect("schedule caption pattern")
});

static EXHIBIT_CAPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bExhibit[ \t]+\d+[^\r\n]*").expect("exhibit caption pattern")
});

static DELIMITED_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|[^\r\n]+\|").expect("delimited row pattern"));

static SEPARATOR_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s|:\-]*-[\s|:\-]*$").expect("separator row pattern"));

/// A position where a table signal was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    /// Byte offset of the signal in the text.
    pub offset: usize,
    /// Caption text, for caption rules. Row rules leave this empty and the
    /// region takes its header from the table's first row.
    pub header: Option<String>,
}

/// A structural pattern that signals a table.
#[derive(Debug, Clone)]
pub enum DetectionRule {
    /// A caption such as `Table 4.2`, `Schedule A` or `Exhibit 3`, anywhere
    /// in a line. The caption's line becomes a region even with no rows.
    ///
    /// The header is capture group 1 if the pattern has one, otherwise the
    /// whole match, trimmed.
    Caption(Regex),
    /// A pipe-delimited row: `| Term | Rate |`.
    DelimitedRow,
    /// A rule line made only of pipes, dashes, colons and whitespace:
    /// `|:-----|-----:|`.
    SeparatorRow,
}

impl DetectionRule {
    /// Compile a custom caption rule.
    ///
    /// ```rust
    /// use tabslab::DetectionRule;
    ///
    /// let rule = DetectionRule::caption(r"(?m)^Annex\s+[IVX]+.*").unwrap();
    /// let seeds = rule.find_seeds("Intro\nAnnex IV  Tariffs\n| a | b |");
    /// assert_eq!(seeds[0].offset, 6);
    /// assert_eq!(seeds[0].header.as_deref(), Some("Annex IV  Tariffs"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPattern`] if the pattern does not compile.
    pub fn caption(pattern: &str) -> Result<Self> {
        Ok(Self::Caption(Regex::new(pattern)?))
    }

    /// Find every seed this rule produces in `text`, in source order.
    pub fn find_seeds(&self, text: &str) -> Vec<Seed> {
        match self {
            Self::Caption(pattern) => pattern
                .captures_iter(text)
                .filter_map(|caps| {
                    let m = caps.get(1).or_else(|| caps.get(0))?;
                    let header = m.as_str().trim();
                    (!header.is_empty()).then(|| Seed {
                        offset: m.start(),
                        header: Some(header.to_string()),
                    })
                })
                .collect(),
            Self::DelimitedRow => line_seeds(text, is_delimited_row),
            Self::SeparatorRow => line_seeds(text, is_separator_row),
        }
    }
}

/// The built-in rules: table, schedule and exhibit captions, then
/// delimited and separator rows.
pub fn default_rules() -> Vec<DetectionRule> {
    vec![
        DetectionRule::Caption(TABLE_CAPTION.clone()),
        DetectionRule::Caption(SCHEDULE_CAPTION.clone()),
        DetectionRule::Caption(EXHIBIT_CAPTION.clone()),
        DetectionRule::DelimitedRow,
        DetectionRule::SeparatorRow,
    ]
}

/// Whether a line looks like part of a table body.
///
/// Purely syntactic: a line with a `|...|` span, or a dash rule built from
/// `|`, `-`, `:` and whitespace. Prose that happens to contain two pipes
/// passes too.
pub fn is_table_line(line: &str) -> bool {
    is_delimited_row(line) || is_separator_row(line)
}

fn is_delimited_row(line: &str) -> bool {
    DELIMITED_ROW.is_match(line)
}

pub(crate) fn is_separator_row(line: &str) -> bool {
    SEPARATOR_ROW.is_match(line)
}

fn line_seeds(text: &str, predicate: fn(&str) -> bool) -> Vec<Seed> {
    let mut seeds = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if predicate(line.trim_end_matches(['\n', '\r'])) {
            seeds.push(Seed {
                offset,
                header: None,
            });
        }
        offset += line.len();
    }
    seeds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_rules() {
        let text = "Intro\nTable 2.1 Mortgage rates\nSchedule AB\nExhibit 12\nTable 3 only";
        let rules = default_rules();

        let table = rules[0].find_seeds(text);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].offset, 6);
        assert_eq!(table[0].header.as_deref(), Some("Table 2.1 Mortgage rates"));

        let schedule = rules[1].find_seeds(text);
        assert_eq!(schedule[0].header.as_deref(), Some("Schedule AB"));

        let exhibit = rules[2].find_seeds(text);
        assert_eq!(exhibit[0].header.as_deref(), Some("Exhibit 12"));
    }

    #[test]
    fn test_caption_mid_line_is_a_seed() {
        let text = "Payments follow Schedule A of the agreement.";
        let seeds = default_rules()[1].find_seeds(text);
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].offset, 16);
        assert_eq!(seeds[0].header.as_deref(), Some("Schedule A of the agreement."));

        let seeds = default_rules()[0].find_seeds("Rates are listed in Table 3.2 below.");
        assert_eq!(seeds[0].header.as_deref(), Some("Table 3.2 below."));

        let indented = "  Schedule C\n";
        assert_eq!(default_rules()[1].find_seeds(indented)[0].offset, 2);
    }

    #[test]
    fn test_caption_needs_word_start() {
        assert!(default_rules()[0].find_seeds("SubTable 1.1").is_empty());
        assert!(default_rules()[2].find_seeds("PreExhibit 4").is_empty());
    }

    #[test]
    fn test_schedule_needs_capitals() {
        assert!(default_rules()[1].find_seeds("Schedule the payment\n").is_empty());
    }

    #[test]
    fn test_row_seeds() {
        let text = "prose\n| a | b |\n|---|---|\n| 1 | 2 |\nmore prose";
        let rows = DetectionRule::DelimitedRow.find_seeds(text);
        let offsets: Vec<usize> = rows.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![6, 16, 26]);

        let separators = DetectionRule::SeparatorRow.find_seeds(text);
        assert_eq!(separators.len(), 1);
        assert_eq!(separators[0].offset, 16);
    }

    #[test]
    fn test_table_line_predicate() {
        assert!(is_table_line("| Rate | Term |"));
        assert!(is_table_line("|:---|---:|"));
        assert!(is_table_line("  ---  "));
        assert!(is_table_line("a | b | c"));
        assert!(!is_table_line("|"));
        assert!(!is_table_line("||"));
        assert!(!is_table_line(""));
        assert!(!is_table_line("   "));
        assert!(!is_table_line("APR: 3.5%"));
        assert!(!is_table_line("rate - fee"));
        assert!(is_table_line("|€|"));
        assert!(is_table_line("\u{a0}--\u{a0}"));
    }

    #[test]
    fn test_crlf_lines() {
        let text = "| a | b |\r\n|---|---|\r\n";
        assert_eq!(DetectionRule::SeparatorRow.find_seeds(text).len(), 1);
    }

    #[test]
    fn test_invalid_caption_pattern() {
        assert!(DetectionRule::caption("Table (").is_err());
    }
}
