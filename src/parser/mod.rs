//! Markdown parser for the prose between math and tables.
//!
//! Covers the subset tutoring content actually uses: ATX headings, emphasis,
//! strikethrough, lists, inline code, fenced code, block quotes, thematic
//! breaks, links and paragraphs. Raw HTML is not recognised; it stays text
//! and is escaped on output.

mod block;
mod inline;
mod lexer;

pub use block::parse_blocks;
pub use inline::parse_inlines;

use crate::ast::Block;

/// Parse markdown prose into blocks. Never fails.
pub fn parse(input: &str) -> Vec<Block> {
    parse_blocks(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Inline;

    #[test]
    fn test_document_shape() {
        let input = "## Worked example\n\nRead the **question** twice.\n\n- list the givens\n- pick a formula\n\n---\n\n```\nanswer = 42\n```";
        let blocks = parse(input);

        assert_eq!(blocks.len(), 5);
        assert!(matches!(&blocks[0], Block::Heading { level: 2, .. }));
        assert!(matches!(&blocks[1], Block::Paragraph(inlines)
            if inlines.iter().any(|i| matches!(i, Inline::Strong(_)))));
        assert!(matches!(&blocks[2], Block::List { ordered: false, .. }));
        assert!(matches!(&blocks[3], Block::ThematicBreak));
        assert!(matches!(&blocks[4], Block::CodeBlock { .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\n").is_empty());
    }
}
