//! Span scanners for block math, pipe tables and inline math.
//!
//! Each scanner walks the input left to right and never backtracks past an
//! accepted match, so matches of one kind never overlap each other.

use nom::{
    bytes::complete::{is_not, tag, take_until},
    character::complete::{anychar, char},
    combinator::{recognize, verify},
    sequence::{delimited, pair},
    IResult,
};
use tracing::trace;

use crate::ast::{SegmentKind, Span};
use crate::segment::table::parse_table;

/// A recognised span and the segment it becomes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Candidate {
    pub span: Span,
    pub kind: SegmentKind,
}

/// Parse block math: `$$`, at least one character (newlines allowed), the
/// next `$$`.
pub fn block_math(input: &str) -> IResult<&str, &str> {
    delimited(
        tag("$$"),
        verify(recognize(pair(anychar, take_until("$$"))), not_blank),
        tag("$$"),
    )(input)
}

/// Parse inline math: `$`, a run of characters that are neither `$` nor a
/// newline, `$`.
pub fn inline_math(input: &str) -> IResult<&str, &str> {
    delimited(char('$'), verify(is_not("$\n"), not_blank), char('$'))(input)
}

/// A `$` pair around a single-line run without `$`, blank or not.
fn dollar_pair(input: &str) -> IResult<&str, &str> {
    delimited(char('$'), is_not("$\n"), char('$'))(input)
}

fn not_blank(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Find every block-math span in the input.
pub(crate) fn find_block_math(input: &str) -> Vec<Candidate> {
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(offset) = input[pos..].find("$$") {
        let start = pos + offset;
        match block_math(&input[start..]) {
            Ok((rest, math)) => {
                let end = input.len() - rest.len();
                trace!(start, end, "block math");
                found.push(Candidate {
                    span: Span::new(start, end),
                    kind: SegmentKind::BlockMath {
                        math: math.trim().to_string(),
                    },
                });
                pos = end;
            }
            // `$` is one byte, so start + 1 stays on a char boundary
            Err(_) => pos = start + 1,
        }
    }

    found
}

/// Find every inline-math span inside `region` of the input.
///
/// Dollars pair up left to right. A pair around blank content consumes both
/// dollars but yields nothing.
pub(crate) fn find_inline_math(input: &str, region: Span) -> Vec<Candidate> {
    let text = &input[region.start..region.end];
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('$') {
        let start = pos + offset;
        match dollar_pair(&text[start..]) {
            Ok((rest, math)) => {
                let end = text.len() - rest.len();
                if not_blank(math) {
                    trace!(start = region.start + start, end = region.start + end, "inline math");
                    found.push(Candidate {
                        span: Span::new(region.start + start, region.start + end),
                        kind: SegmentKind::InlineMath {
                            math: math.trim().to_string(),
                        },
                    });
                }
                pos = end;
            }
            Err(_) => pos = start + 1,
        }
    }

    found
}

/// A source line with its byte offsets. `end` includes the line terminator.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

fn lines_with_offsets(input: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;

    for raw in input.split_inclusive('\n') {
        let end = start + raw.len();
        let text = raw.trim_end_matches('\n').trim_end_matches('\r');
        lines.push(Line { start, end, text });
        start = end;
    }

    lines
}

/// Find every pipe table: header row, delimiter row, one or more body rows.
pub(crate) fn find_tables(input: &str) -> Vec<Candidate> {
    let lines = lines_with_offsets(input);
    let mut found = Vec::new();
    let mut i = 0;

    while i + 2 < lines.len() {
        let is_table = is_table_row(lines[i].text)
            && is_table_delimiter(lines[i + 1].text)
            && is_table_row(lines[i + 2].text);
        if !is_table {
            i += 1;
            continue;
        }

        let mut j = i + 3;
        while j < lines.len() && is_table_row(lines[j].text) {
            j += 1;
        }

        let span = Span::new(lines[i].start, lines[j - 1].end);
        let table = parse_table(&input[span.start..span.end]);
        trace!(start = span.start, end = span.end, rows = table.rows.len(), "table");
        found.push(Candidate {
            span,
            kind: SegmentKind::Table(table),
        });
        i = j;
    }

    found
}

/// Leading spaces or tabs before the first pipe are tolerated.
fn table_line(line: &str) -> &str {
    line.trim_start_matches([' ', '\t']).trim_end()
}

/// A row starts and ends with `|` and has something between the pipes.
pub(crate) fn is_table_row(line: &str) -> bool {
    let line = table_line(line);
    line.len() >= 3 && line.starts_with('|') && line.ends_with('|')
}

/// A delimiter row is a row made only of pipes, dashes, colons and
/// whitespace, with at least one dash.
pub(crate) fn is_table_delimiter(line: &str) -> bool {
    let line = table_line(line);
    is_table_row(line)
        && line.contains('-')
        && line
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}
