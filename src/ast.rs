//! Syntax tree definitions: content segments, tables and the markdown tree.

use serde::Serialize;

/// A byte range into the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the two half-open ranges share at least one byte.
    pub fn intersects(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One typed, contiguous span of a content string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub span: Span,
    #[serde(flatten)]
    pub kind: SegmentKind,
}

impl Segment {
    /// The literal source text this segment was produced from, delimiters included.
    pub fn source<'a>(&self, input: &'a str) -> &'a str {
        &input[self.span.start..self.span.end]
    }

    /// Text segments made only of whitespace carry nothing to render.
    pub fn is_blank(&self) -> bool {
        matches!(&self.kind, SegmentKind::Text { text } if text.trim().is_empty())
    }

    /// Whether this segment flows inline with surrounding prose.
    pub fn is_inline(&self) -> bool {
        matches!(
            self.kind,
            SegmentKind::Text { .. } | SegmentKind::InlineMath { .. }
        )
    }
}

/// Segment variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SegmentKind {
    /// Prose, possibly markdown formatted
    Text { text: String },
    /// `$...$` math, delimiters stripped and content trimmed
    InlineMath { math: String },
    /// `$$...$$` math, delimiters stripped and content trimmed
    BlockMath { math: String },
    /// A pipe-delimited markdown table
    Table(Table),
}

/// Table column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A parsed table. Every row holds exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub alignments: Vec<Alignment>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from structured data, normalising every row to the
    /// header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let alignments = vec![Alignment::default(); headers.len()];
        Self::with_alignments(headers, alignments, rows)
    }

    pub fn with_alignments(
        headers: Vec<String>,
        mut alignments: Vec<Alignment>,
        rows: Vec<Vec<String>>,
    ) -> Self {
        let width = headers.len();
        alignments.resize(width, Alignment::default());
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self {
            headers,
            alignments,
            rows,
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// Block-level markdown elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A paragraph of inline content
    Paragraph(Vec<Inline>),

    /// A heading with level (1-6)
    Heading { level: u8, content: Vec<Inline> },

    /// A fenced code block
    CodeBlock {
        language: Option<String>,
        content: String,
    },

    /// A block quote
    BlockQuote(Vec<Block>),

    /// An ordered or unordered list
    List {
        ordered: bool,
        start: Option<u32>,
        items: Vec<ListItem>,
    },

    /// A thematic break (horizontal rule)
    ThematicBreak,
}

/// List item containing blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub content: Vec<Block>,
}

/// Inline-level markdown elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// Plain text
    Text(String),

    /// Emphasized text (italic)
    Emphasis(Vec<Inline>),

    /// Strong text (bold)
    Strong(Vec<Inline>),

    /// Strikethrough text
    Strikethrough(Vec<Inline>),

    /// Inline code
    Code(String),

    /// A link
    Link {
        url: String,
        title: Option<String>,
        content: Vec<Inline>,
    },

    /// Soft line break
    SoftBreak,

    /// Hard line break
    HardBreak,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_span_intersection() {
        let a = Span::new(0, 5);
        assert!(a.intersects(&Span::new(4, 8)));
        assert!(!a.intersects(&Span::new(5, 8)));
        assert!(Span::new(2, 3).intersects(&a));
    }

    #[test]
    fn test_table_normalises_rows() {
        let table = Table::new(
            vec!["x".into(), "y".into()],
            vec![vec!["1".into()], vec!["1".into(), "2".into(), "3".into()]],
        );
        assert_eq!(table.rows[0], vec!["1".to_string(), String::new()]);
        assert_eq!(table.rows[1], vec!["1".to_string(), "2".to_string()]);
        assert_eq!(table.alignments.len(), 2);
    }

    #[test]
    fn test_segment_serializes_tagged() {
        let segment = Segment {
            span: Span::new(0, 5),
            kind: SegmentKind::InlineMath { math: "x".into() },
        };
        let json = serde_json::to_string(&segment).unwrap();
        assert!(json.contains(r#""type":"inline-math""#));
        assert!(json.contains(r#""math":"x""#));
    }
}
