//! Pipe table parsing.

use crate::ast::{Alignment, Table};

/// Parse the source of a recognised pipe table.
///
/// The first non-blank line is the header, the second the delimiter row;
/// every following line is a body row. Rows are normalised to the header
/// width.
pub fn parse_table(source: &str) -> Table {
    let mut lines = source.lines().filter(|line| !line.trim().is_empty());

    let headers = lines.next().map(split_row).unwrap_or_default();
    let alignments = lines.next().map(parse_alignments).unwrap_or_default();
    let rows = lines.map(split_row).collect();

    Table::with_alignments(headers, alignments, rows)
}

/// Split a row on `|`, dropping the empty edge cells the outer pipes produce.
fn split_row(line: &str) -> Vec<String> {
    line.trim()
        .trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

fn parse_alignments(line: &str) -> Vec<Alignment> {
    line.trim()
        .trim_matches('|')
        .split('|')
        .map(|cell| {
            let cell = cell.trim();
            match (cell.starts_with(':'), cell.ends_with(':')) {
                (true, true) => Alignment::Center,
                (false, true) => Alignment::Right,
                _ => Alignment::Left,
            }
        })
        .collect()
}
