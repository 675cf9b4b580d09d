//! Block-level parsing for markdown.

use crate::ast::{Block, ListItem};
use crate::parser::inline::parse_inlines;
use crate::parser::lexer::{
    block_quote_marker, fenced_code_start, heading, list_item_marker, thematic_break, ListMarker,
    Token,
};

/// Quotes and lists nested deeper than this are read as paragraph text.
pub const MAX_NESTING: usize = 32;

/// Parse all blocks from content.
pub fn parse_blocks(input: &str) -> Vec<Block> {
    parse_blocks_at(input, 0)
}

fn parse_blocks_at(input: &str, depth: usize) -> Vec<Block> {
    let mut blocks = Vec::new();
    let lines: Vec<&str> = input.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        // Skip blank lines
        if line.trim().is_empty() {
            i += 1;
            continue;
        }

        let (block, consumed) = if let Some(parsed) = try_parse_heading(line) {
            parsed
        } else if let Some(parsed) = try_parse_thematic_break(line) {
            parsed
        } else if let Some(parsed) = try_parse_fenced_code(&lines[i..]) {
            parsed
        } else if let Some(parsed) = try_parse_block_quote(&lines[i..], depth) {
            parsed
        } else if let Some(parsed) = try_parse_list(&lines[i..], depth) {
            parsed
        } else {
            parse_paragraph(&lines[i..])
        };

        blocks.push(block);
        i += consumed;
    }

    blocks
}

fn try_parse_heading(line: &str) -> Option<(Block, usize)> {
    match heading(line.trim()) {
        Ok((_, Token::Heading(level, content))) => Some((
            Block::Heading {
                level,
                content: parse_inlines(content),
            },
            1,
        )),
        _ => None,
    }
}

fn try_parse_thematic_break(line: &str) -> Option<(Block, usize)> {
    thematic_break(line.trim()).ok().map(|_| (Block::ThematicBreak, 1))
}

fn try_parse_fenced_code(lines: &[&str]) -> Option<(Block, usize)> {
    let first = lines[0].trim_start();
    let fence = if first.starts_with("```") {
        "```"
    } else if first.starts_with("~~~") {
        "~~~"
    } else {
        return None;
    };

    let Ok((_, Token::FencedCodeStart(lang))) = fenced_code_start(first) else {
        return None;
    };
    let language = (!lang.is_empty()).then(|| lang.to_string());

    let mut content = String::new();
    let mut i = 1;

    while i < lines.len() {
        let line = lines[i];
        if line.trim() == fence {
            return Some((Block::CodeBlock { language, content }, i + 1));
        }
        if i > 1 {
            content.push('\n');
        }
        content.push_str(line);
        i += 1;
    }

    // Unclosed fence - treat rest as code
    Some((Block::CodeBlock { language, content }, lines.len()))
}

/// Split a line into its ASCII indentation width and the rest.
fn split_indent(line: &str) -> (usize, &str) {
    let rest = line.trim_start_matches([' ', '\t']);
    (line.len() - rest.len(), rest)
}

fn try_parse_block_quote(lines: &[&str], depth: usize) -> Option<(Block, usize)> {
    if depth >= MAX_NESTING || !lines[0].trim_start().starts_with('>') {
        return None;
    }

    let mut quote_lines = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let trimmed = lines[i].trim_start();
        match block_quote_marker(trimmed) {
            Ok((rest, Token::BlockQuoteMarker)) => quote_lines.push(rest),
            _ => break,
        }
        i += 1;
    }

    let inner = quote_lines.join("\n");
    Some((Block::BlockQuote(parse_blocks_at(&inner, depth + 1)), i))
}

fn try_parse_list(lines: &[&str], depth: usize) -> Option<(Block, usize)> {
    if depth >= MAX_NESTING {
        return None;
    }
    let (indent, trimmed) = split_indent(lines[0]);

    let Ok((_, Token::ListItemMarker(marker_type))) = list_item_marker(trimmed) else {
        return None;
    };

    let ordered = matches!(marker_type, ListMarker::Ordered(_));
    let start = match marker_type {
        ListMarker::Ordered(n) => Some(n),
        ListMarker::Unordered => None,
    };

    let mut items = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let (current_indent, trimmed) = split_indent(lines[i]);

        if trimmed.trim().is_empty() {
            // Blank lines between items keep the list open
            let mut j = i + 1;
            while j < lines.len() && lines[j].trim().is_empty() {
                j += 1;
            }
            let next_is_item = j < lines.len() && {
                let (next_indent, next) = split_indent(lines[j]);
                next_indent <= indent && list_item_marker(next).is_ok()
            };
            if !next_is_item {
                break;
            }
            i = j;
            continue;
        }

        let Ok((rest, Token::ListItemMarker(m))) = list_item_marker(trimmed) else {
            break;
        };

        let same_type = matches!(
            (&marker_type, &m),
            (ListMarker::Ordered(_), ListMarker::Ordered(_))
                | (ListMarker::Unordered, ListMarker::Unordered)
        );
        if current_indent > indent || !same_type {
            break;
        }

        // Continuation lines are de-indented by the width of the marker
        let content_indent = current_indent + (trimmed.len() - rest.len());
        let mut item_lines = vec![rest.to_string()];
        i += 1;

        while i < lines.len() {
            let next_line = lines[i];
            let (next_indent, next_trimmed) = split_indent(next_line);

            if next_trimmed.trim().is_empty() {
                // A blank line only continues the item if indented content follows
                let mut j = i + 1;
                while j < lines.len() && lines[j].trim().is_empty() {
                    j += 1;
                }
                let continues = j < lines.len() && split_indent(lines[j]).0 > indent;
                if !continues {
                    break;
                }
                item_lines.push(String::new());
                i += 1;
                continue;
            }

            if next_indent <= indent {
                // A sibling item, or the end of the list
                break;
            }

            let strip = next_indent.min(content_indent);
            item_lines.push(next_line[strip..].to_string());
            i += 1;
        }

        items.push(ListItem {
            content: parse_blocks_at(&item_lines.join("\n"), depth + 1),
        });
    }

    if items.is_empty() {
        return None;
    }

    Some((
        Block::List {
            ordered,
            start,
            items,
        },
        i,
    ))
}

fn parse_paragraph(lines: &[&str]) -> (Block, usize) {
    let mut para_lines = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        // End paragraph on blank line
        if trimmed.is_empty() {
            break;
        }

        // End paragraph on block-level element
        if i > 0 && starts_block(trimmed) {
            break;
        }

        para_lines.push(trimmed);
        i += 1;
    }

    let content = para_lines.join("\n");
    (Block::Paragraph(parse_inlines(&content)), i.max(1))
}

fn starts_block(trimmed: &str) -> bool {
    heading(trimmed).is_ok()
        || thematic_break(trimmed).is_ok()
        || trimmed.starts_with("```")
        || trimmed.starts_with("~~~")
        || trimmed.starts_with('>')
        || list_item_marker(trimmed).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Inline;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_heading() {
        let blocks = parse_blocks("# Hello World");
        assert_eq!(
            blocks,
            vec![Block::Heading {
                level: 1,
                content: vec![Inline::Text("Hello World".to_string())],
            }]
        );
    }

    #[test]
    fn test_parse_code_block() {
        let input = "```rust\nfn main() {}\n```";
        let blocks = parse_blocks(input);
        if let Block::CodeBlock { language, content } = &blocks[0] {
            assert_eq!(language.as_deref(), Some("rust"));
            assert_eq!(content, "fn main() {}");
        } else {
            panic!("Expected code block");
        }
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let blocks = parse_blocks("```\nline one\nline two");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                language: None,
                content: "line one\nline two".to_string(),
            }]
        );
    }

    #[test]
    fn test_paragraphs_split_on_blank_line() {
        let blocks = parse_blocks("First line\nstill first\n\nSecond");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(&blocks[0], Block::Paragraph(inlines) if inlines.len() == 3));
    }

    #[test]
    fn test_ordered_list() {
        let blocks = parse_blocks("3. three\n4. four\n\nAfter");
        if let Block::List {
            ordered,
            start,
            items,
        } = &blocks[0]
        {
            assert!(*ordered);
            assert_eq!(*start, Some(3));
            assert_eq!(items.len(), 2);
        } else {
            panic!("Expected list");
        }
        assert!(matches!(&blocks[1], Block::Paragraph(_)));
    }

    #[test]
    fn test_nested_list() {
        let blocks = parse_blocks("- outer\n  - inner one\n  - inner two\n- second");
        let Block::List { items, .. } = &blocks[0] else {
            panic!("Expected list");
        };
        assert_eq!(items.len(), 2);
        assert!(matches!(
            &items[0].content[1],
            Block::List { items, .. } if items.len() == 2
        ));
    }

    #[test]
    fn test_paragraph_then_list() {
        let blocks = parse_blocks("Steps:\n1. add\n2. divide");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(&blocks[1], Block::List { ordered: true, .. }));
    }

    #[test]
    fn test_block_quote() {
        let blocks = parse_blocks("> quoted\n> text\n\nplain");
        assert!(matches!(&blocks[0], Block::BlockQuote(inner) if inner.len() == 1));
        assert_eq!(blocks.len(), 2);
    }

    fn quote_depth(blocks: &[Block]) -> usize {
        match blocks.first() {
            Some(Block::BlockQuote(inner)) => 1 + quote_depth(inner),
            _ => 0,
        }
    }

    #[test]
    fn test_deep_quotes_stop_at_nesting_limit() {
        let input = format!("{} x", ">".repeat(5000));
        let blocks = parse_blocks(&input);
        assert_eq!(quote_depth(&blocks), MAX_NESTING);
    }

    #[test]
    fn test_deep_lists_stop_at_nesting_limit() {
        let input = "- ".repeat(3000) + "leaf";
        let blocks = parse_blocks(&input);
        assert_eq!(blocks.len(), 1);
        assert!(matches!(&blocks[0], Block::List { .. }));
    }

    #[test]
    fn test_unicode_space_after_list_item() {
        // U+3000 is whitespace but not indentation
        let blocks = parse_blocks("- first item\n\u{3000}continued");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(&blocks[1], Block::Paragraph(_)));

        let blocks = parse_blocks("- a\n \u{a0}b");
        let Block::List { items, .. } = &blocks[0] else {
            panic!("Expected list");
        };
        assert_eq!(items.len(), 1);
    }
}
