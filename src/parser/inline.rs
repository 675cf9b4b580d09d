//! Inline-level parsing for markdown.

use crate::ast::Inline;
use crate::parser::block::MAX_NESTING;
use crate::parser::lexer::{emphasis, inline_code, strikethrough, strong, Token};

/// Parse inline content from a string.
///
/// Spans nested deeper than [`MAX_NESTING`] keep their markers as text.
pub fn parse_inlines(input: &str) -> Vec<Inline> {
    parse_inlines_at(input, 0)
}

fn parse_inlines_at(input: &str, depth: usize) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() {
        if let Some((inline, rest)) = try_parse_inline(remaining, depth) {
            push_inline(&mut inlines, inline);
            remaining = rest;
            continue;
        }

        let (text, rest) = consume_text(remaining);
        if text.is_empty() {
            // No progress made - consume one character to avoid an infinite loop
            let Some(c) = remaining.chars().next() else {
                break;
            };
            push_inline(&mut inlines, Inline::Text(c.to_string()));
            remaining = &remaining[c.len_utf8()..];
            continue;
        }

        push_text_with_breaks(&mut inlines, text);
        remaining = rest;
    }

    inlines
}

/// Push an inline, merging adjacent text runs.
fn push_inline(inlines: &mut Vec<Inline>, inline: Inline) {
    if let Inline::Text(new) = &inline {
        if let Some(Inline::Text(last)) = inlines.last_mut() {
            last.push_str(new);
            return;
        }
    }
    inlines.push(inline);
}

fn push_text_with_breaks(inlines: &mut Vec<Inline>, text: &str) {
    let parts: Vec<&str> = text.split('\n').collect();
    for (i, part) in parts.iter().enumerate() {
        let is_last = i == parts.len() - 1;
        if is_last {
            if !part.is_empty() {
                push_inline(inlines, Inline::Text(part.to_string()));
            }
            break;
        }

        // Hard break: two trailing spaces or a trailing backslash
        let hard = part.ends_with("  ") || part.ends_with('\\');
        let content = if hard {
            part.trim_end_matches(' ').trim_end_matches('\\')
        } else {
            part.trim_end_matches(' ')
        };
        if !content.is_empty() {
            push_inline(inlines, Inline::Text(content.to_string()));
        }
        inlines.push(if hard { Inline::HardBreak } else { Inline::SoftBreak });
    }
}

fn try_parse_inline(input: &str, depth: usize) -> Option<(Inline, &str)> {
    // Backslash escape of ASCII punctuation
    if let Some(after) = input.strip_prefix('\\') {
        let next = after.chars().next()?;
        if next == '\n' {
            return Some((Inline::HardBreak, &after[1..]));
        }
        if next.is_ascii_punctuation() {
            return Some((Inline::Text(next.to_string()), &after[1..]));
        }
        return None;
    }
    if depth >= MAX_NESTING {
        return None;
    }
    let nested = |content: &str| parse_inlines_at(content, depth + 1);

    // Strong (**...** or __...__)
    if input.starts_with("**") || input.starts_with("__") {
        if let Ok((rest, Token::Strong(content))) = strong(input) {
            return Some((Inline::Strong(nested(content)), rest));
        }
    }

    // Emphasis (*...* or _..._)
    if input.starts_with('*') || input.starts_with('_') {
        if let Ok((rest, Token::Emphasis(content))) = emphasis(input) {
            return Some((Inline::Emphasis(nested(content)), rest));
        }
    }

    // Strikethrough (~~...~~)
    if input.starts_with("~~") {
        if let Ok((rest, Token::Strikethrough(content))) = strikethrough(input) {
            return Some((Inline::Strikethrough(nested(content)), rest));
        }
    }

    // Inline code (`...`)
    if input.starts_with('`') {
        if let Ok((rest, Token::InlineCode(content))) = inline_code(input) {
            return Some((Inline::Code(content.to_string()), rest));
        }
    }

    // Link ([text](url "title"))
    if input.starts_with('[') {
        return try_parse_link(input, depth);
    }

    None
}

fn try_parse_link(input: &str, depth: usize) -> Option<(Inline, &str)> {
    let mut depth = 0;
    let mut text_end = None;

    for (i, c) in input.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    text_end = Some(i);
                    break;
                }
            }
            '\n' => return None,
            _ => {}
        }
    }

    let text_end = text_end?;
    let text = &input[1..text_end];
    let after_text = input[text_end + 1..].strip_prefix('(')?;
    let url_end = after_text.find(')')?;

    let (url, title) = parse_url_and_title(&after_text[..url_end]);
    if url.is_empty() || url.contains(char::is_whitespace) {
        return None;
    }

    Some((
        Inline::Link {
            url: url.to_string(),
            title: title.map(String::from),
            content: parse_inlines_at(text, depth + 1),
        },
        &after_text[url_end + 1..],
    ))
}

fn parse_url_and_title(input: &str) -> (&str, Option<&str>) {
    let input = input.trim();

    for quote in ['"', '\''] {
        if let Some(quote_start) = input.find(quote) {
            if let Some(quote_end) = input[quote_start + 1..].find(quote) {
                let url = input[..quote_start].trim();
                let title = &input[quote_start + 1..quote_start + 1 + quote_end];
                return (url, Some(title));
            }
        }
    }

    (input, None)
}

fn consume_text(input: &str) -> (&str, &str) {
    // Characters that might start inline elements
    const SPECIAL: &[char] = &['*', '_', '`', '[', '~', '\\'];

    let mut prev: Option<char> = None;
    for (i, c) in input.char_indices() {
        let starts_element = match c {
            // Intraword underscores (snake_case) never open emphasis
            '_' => !prev.is_some_and(char::is_alphanumeric),
            '~' => input[i..].starts_with("~~"),
            c => SPECIAL.contains(&c),
        };

        if starts_element && i > 0 {
            return (&input[..i], &input[i..]);
        }
        if starts_element && i == 0 {
            return ("", input);
        }
        prev = Some(c);
    }

    (input, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text() {
        let inlines = parse_inlines("Hello, world!");
        assert_eq!(inlines, vec![Inline::Text("Hello, world!".to_string())]);
    }

    #[test]
    fn test_emphasis() {
        let inlines = parse_inlines("Hello *world*!");
        assert_eq!(inlines.len(), 3);
        assert!(matches!(&inlines[1], Inline::Emphasis(_)));
    }

    #[test]
    fn test_strong() {
        let inlines = parse_inlines("Hello **world**!");
        assert!(matches!(&inlines[1], Inline::Strong(_)));
    }

    #[test]
    fn test_unmatched_markers_are_text() {
        let inlines = parse_inlines("2 * 3 = 6 and a_b_c");
        assert_eq!(
            inlines,
            vec![Inline::Text("2 * 3 = 6 and a_b_c".to_string())]
        );
    }

    #[test]
    fn test_escaped_marker() {
        let inlines = parse_inlines(r"\*not bold\*");
        assert_eq!(inlines, vec![Inline::Text("*not bold*".to_string())]);
    }

    #[test]
    fn test_link() {
        let inlines = parse_inlines("Click [here](https://example.com \"Title\")!");
        let link = inlines.iter().find(|i| matches!(i, Inline::Link { .. }));
        if let Some(Inline::Link { url, title, .. }) = link {
            assert_eq!(url, "https://example.com");
            assert_eq!(title.as_deref(), Some("Title"));
        } else {
            panic!("Expected link");
        }
    }

    #[test]
    fn test_deep_nesting_falls_back_to_text() {
        let input = format!("{}x{}", "[".repeat(2000), "](u)".repeat(2000));
        let mut inlines = parse_inlines(&input);
        let mut depth = 0;
        while let [Inline::Link { content, .. }] = inlines.as_slice() {
            inlines = content.clone();
            depth += 1;
        }
        assert_eq!(depth, MAX_NESTING);
        assert!(matches!(&inlines[0], Inline::Text(text) if text.starts_with('[')));
    }

    #[test]
    fn test_line_breaks() {
        let inlines = parse_inlines("one\ntwo  \nthree");
        assert_eq!(
            inlines,
            vec![
                Inline::Text("one".to_string()),
                Inline::SoftBreak,
                Inline::Text("two".to_string()),
                Inline::HardBreak,
                Inline::Text("three".to_string()),
            ]
        );
    }
}
