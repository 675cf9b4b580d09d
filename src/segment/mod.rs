//! Content segmentation.
//!
//! Splits a content string into an ordered list of [`Segment`]s: prose,
//! inline math, block math and pipe tables. Matching priority is block math,
//! then tables, then inline math; a lower-priority match that would overlap
//! an accepted one is never produced.
//!
//! The segments tile the input: concatenating the source of every segment
//! gives back the input exactly. Whitespace-only gaps between matches are
//! kept as text segments; renderers skip them.

mod scan;
mod table;

pub use scan::{block_math, inline_math};
pub use table::parse_table;

use tracing::debug;

use crate::ast::{Segment, SegmentKind, Span};
use scan::{find_block_math, find_inline_math, find_tables, Candidate};

/// Split `input` into segments. Never fails; the empty string yields no
/// segments.
pub fn segment(input: &str) -> Vec<Segment> {
    if input.is_empty() {
        return Vec::new();
    }

    let mut accepted = find_block_math(input);

    let tables: Vec<Candidate> = find_tables(input)
        .into_iter()
        .filter(|table| !accepted.iter().any(|block| block.span.intersects(&table.span)))
        .collect();
    accepted.extend(tables);
    accepted.sort_by_key(|candidate| candidate.span.start);

    // Inline math is scanned over the whole input, then dropped wherever it
    // touches block math or a table
    let inline: Vec<Candidate> = find_inline_math(input, Span::new(0, input.len()))
        .into_iter()
        .filter(|math| !accepted.iter().any(|a| a.span.intersects(&math.span)))
        .collect();
    accepted.extend(inline);
    accepted.sort_by_key(|candidate| candidate.span.start);

    let segments = tile(input, accepted);
    debug!(
        bytes = input.len(),
        segments = segments.len(),
        "segmented content"
    );
    segments
}

/// Split a single line of text (a table cell, a caption) into text and
/// inline math only.
pub fn segment_inline(input: &str) -> Vec<Segment> {
    if input.is_empty() {
        return Vec::new();
    }
    let found = find_inline_math(input, Span::new(0, input.len()));
    tile(input, found)
}

/// Whether a segment list contains anything other than prose.
pub fn has_markup(segments: &[Segment]) -> bool {
    segments
        .iter()
        .any(|segment| !matches!(segment.kind, SegmentKind::Text { .. }))
}

/// Turn sorted matches into a full tiling of the input, filling the gaps
/// with text segments.
fn tile(input: &str, sorted: Vec<Candidate>) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(sorted.len() * 2 + 1);
    let mut cursor = 0;

    for candidate in sorted {
        if candidate.span.start > cursor {
            segments.push(text_segment(input, Span::new(cursor, candidate.span.start)));
        }
        cursor = candidate.span.end;
        segments.push(Segment {
            span: candidate.span,
            kind: candidate.kind,
        });
    }
    if cursor < input.len() {
        segments.push(text_segment(input, Span::new(cursor, input.len())));
    }

    segments
}

fn text_segment(input: &str, span: Span) -> Segment {
    Segment {
        span,
        kind: SegmentKind::Text {
            text: input[span.start..span.end].to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Table;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<SegmentKind> {
        segment(input).into_iter().map(|s| s.kind).collect()
    }

    fn text(s: &str) -> SegmentKind {
        SegmentKind::Text {
            text: s.to_string(),
        }
    }

    fn inline(s: &str) -> SegmentKind {
        SegmentKind::InlineMath {
            math: s.to_string(),
        }
    }

    fn block(s: &str) -> SegmentKind {
        SegmentKind::BlockMath {
            math: s.to_string(),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_plain_text_is_one_segment() {
        let input = "Photosynthesis happens in the chloroplast.\n\nIt needs light.";
        assert_eq!(kinds(input), vec![text(input)]);
    }

    #[test]
    fn test_inline_math_scenario() {
        assert_eq!(
            kinds("The area is $A = \\pi r^2$ for a circle."),
            vec![
                text("The area is "),
                inline("A = \\pi r^2"),
                text(" for a circle."),
            ]
        );
    }

    #[test]
    fn test_block_math_scenario() {
        assert_eq!(
            kinds("$$\\int_0^1 x\\,dx = \\frac{1}{2}$$"),
            vec![block("\\int_0^1 x\\,dx = \\frac{1}{2}")]
        );
    }

    #[test]
    fn test_table_scenario() {
        let segments = segment("| A | B |\n|---|---|\n| 1 | 2 |");
        assert_eq!(segments.len(), 1);
        let SegmentKind::Table(table) = &segments[0].kind else {
            panic!("Expected table");
        };
        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn test_block_math_content_is_trimmed() {
        assert_eq!(
            kinds("Solve:\n$$\n x^2 - 4 = 0 \n$$\nDone."),
            vec![text("Solve:\n"), block("x^2 - 4 = 0"), text("\nDone.")]
        );
    }

    #[test]
    fn test_block_math_wins_over_inline() {
        let segments = segment("$$ a = $b$ + c $$");
        assert_eq!(segments.len(), 1);
        assert!(matches!(segments[0].kind, SegmentKind::BlockMath { .. }));
    }

    #[test]
    fn test_inline_after_block_is_found() {
        assert_eq!(
            kinds("$$a$$\nthen $b$"),
            vec![block("a"), text("\nthen "), inline("b")]
        );
    }

    #[test]
    fn test_dollars_pair_across_block_math() {
        // `$x $`, `$y$` and `$ $` pair up first; all touch the block
        assert_eq!(
            kinds("$x $$y$$ $z$"),
            vec![text("$x "), block("y"), text(" $z$")]
        );
        assert_eq!(
            kinds("$$a$$ then $b$"),
            vec![block("a"), text(" then $b$")]
        );
    }

    #[test]
    fn test_two_by_two_table() {
        let segments = segment("| Element | Symbol |\n|---|---|\n| Sodium | Na |\n| Potassium | K |\n");
        assert_eq!(segments.len(), 1);
        let SegmentKind::Table(table) = &segments[0].kind else {
            panic!("Expected table");
        };
        assert_eq!(table.headers.len(), 2);
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|row| row.len() == 2));
        assert_eq!(table.rows[1], vec!["Potassium", "K"]);
    }

    #[test]
    fn test_table_inside_block_math_is_discarded() {
        let input = "$$\n| a | b |\n|---|---|\n| 1 | 2 |\n$$";
        let segments = segment(input);
        assert_eq!(segments.len(), 1);
        assert!(matches!(segments[0].kind, SegmentKind::BlockMath { .. }));
    }

    #[test]
    fn test_inline_math_inside_table_stays_in_cell() {
        let input = "| x | $x^2$ |\n|---|---|\n| 2 | $4$ |\n";
        let segments = segment(input);
        assert_eq!(segments.len(), 1);
        let SegmentKind::Table(table) = &segments[0].kind else {
            panic!("Expected table");
        };
        assert_eq!(table.headers[1], "$x^2$");
        assert_eq!(table.rows[0][1], "$4$");
    }

    #[test]
    fn test_dangling_dollar_is_text() {
        assert_eq!(
            kinds("Pay $x$ now, keep $5"),
            vec![text("Pay "), inline("x"), text(" now, keep $5")]
        );
    }

    #[test]
    fn test_single_row_without_delimiter_is_text() {
        let input = "|a|b|";
        assert_eq!(kinds(input), vec![text(input)]);
    }

    #[test]
    fn test_whitespace_gaps_are_kept() {
        let input = "$a$ $b$";
        let segments = segment(input);
        assert_eq!(segments.len(), 3);
        assert!(segments[1].is_blank());
    }

    #[test]
    fn test_mixed_content_round_trips() {
        let input = "Given $v = u + at$:\n\n| t | v |\n|---|---|\n| 1 | 5 |\n\nso $$v^2 = u^2 + 2as$$ holds.";
        let segments = segment(input);
        let rebuilt: String = segments.iter().map(|s| s.source(input)).collect();
        assert_eq!(rebuilt, input);
        assert!(segments
            .windows(2)
            .all(|pair| pair[0].span.end == pair[1].span.start));
        assert!(has_markup(&segments));
    }

    #[test]
    fn test_segment_inline_for_cells() {
        let segments = segment_inline("$x^2$ when x > 0");
        let kinds: Vec<SegmentKind> = segments.into_iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![inline("x^2"), text(" when x > 0")]);
    }

    #[test]
    fn test_structured_table_equals_parsed() {
        let parsed = parse_table("| A | B |\n|---|---|\n| 1 | 2 |");
        let built = Table::new(
            vec!["A".to_string(), "B".to_string()],
            vec![vec!["1".to_string(), "2".to_string()]],
        );
        assert_eq!(parsed, built);
    }
}
