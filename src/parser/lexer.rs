//! Lexer for tokenizing markdown source.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while1, take_while_m_n},
    character::complete::{char, not_line_ending, space0, space1},
    combinator::{eof, map, not, opt, peek, recognize, verify},
    multi::many0,
    sequence::{delimited, pair, terminated, tuple},
    IResult,
};

/// A token from the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    // Block-level tokens
    Heading(u8, &'a str),     // Level, content
    FencedCodeStart(&'a str), // Language
    ThematicBreak,
    BlockQuoteMarker,
    ListItemMarker(ListMarker),

    // Inline tokens
    Emphasis(&'a str),      // * or _
    Strong(&'a str),        // ** or __
    Strikethrough(&'a str), // ~~
    InlineCode(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListMarker {
    Unordered,
    Ordered(u32),
}

/// Parse a heading (ATX style: # Heading).
pub fn heading(input: &str) -> IResult<&str, Token<'_>> {
    let (input, hashes) = take_while_m_n(1, 6, |c| c == '#')(input)?;
    let level = hashes.len() as u8;
    let (input, _) = alt((space1, eof))(input)?;
    let (input, content) = not_line_ending(input)?;
    // Trim trailing # and spaces
    let content = content.trim_end_matches(|c| c == '#' || c == ' ');
    Ok((input, Token::Heading(level, content)))
}

/// Parse a thematic break (---, ***, ___).
pub fn thematic_break(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = alt((
        recognize(tuple((tag("---"), many0(char('-'))))),
        recognize(tuple((tag("***"), many0(char('*'))))),
        recognize(tuple((tag("___"), many0(char('_'))))),
    ))(input)?;
    let (input, _) = terminated(space0, eof)(input)?;
    Ok((input, Token::ThematicBreak))
}

/// Parse a fenced code block start.
pub fn fenced_code_start(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = alt((tag("```"), tag("~~~")))(input)?;
    let (input, _) = space0(input)?;
    let (input, lang) =
        opt(take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_' || c == '+'))(input)?;
    let (input, _) = not_line_ending(input)?;
    Ok((input, Token::FencedCodeStart(lang.unwrap_or(""))))
}

/// Parse a block quote marker.
pub fn block_quote_marker(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('>')(input)?;
    let (input, _) = opt(char(' '))(input)?;
    Ok((input, Token::BlockQuoteMarker))
}

/// Parse a list item marker.
pub fn list_item_marker(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        // Unordered
        map(
            pair(alt((char('-'), char('*'), char('+'))), space1),
            |_| Token::ListItemMarker(ListMarker::Unordered),
        ),
        // Ordered
        map(
            tuple((
                take_while_m_n(1, 9, |c: char| c.is_ascii_digit()),
                alt((char('.'), char(')'))),
                space1,
            )),
            |(num, _, _): (&str, _, _)| {
                Token::ListItemMarker(ListMarker::Ordered(num.parse().unwrap_or(1)))
            },
        ),
    ))(input)
}

/// Parse inline code (`code`).
pub fn inline_code(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('`')(input)?;
    let (input, _) = peek(not(char('`')))(input)?;
    let (input, content) = take_until("`")(input)?;
    let (input, _) = char('`')(input)?;
    Ok((input, Token::InlineCode(content)))
}

/// Parse emphasis (*text* or _text_).
pub fn emphasis(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        delimited(
            pair(char('*'), peek(not(char('*')))),
            map(flanked_until("*"), Token::Emphasis),
            char('*'),
        ),
        delimited(
            pair(char('_'), peek(not(char('_')))),
            map(flanked_until("_"), Token::Emphasis),
            char('_'),
        ),
    ))(input)
}

/// Parse strong (**text** or __text__).
pub fn strong(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        delimited(tag("**"), map(flanked_until("**"), Token::Strong), tag("**")),
        delimited(tag("__"), map(flanked_until("__"), Token::Strong), tag("__")),
    ))(input)
}

/// Content up to `delim` that neither starts nor ends with whitespace.
fn flanked_until<'a>(delim: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    verify(take_until(delim), |s: &str| {
        !s.is_empty() && !s.starts_with(char::is_whitespace) && !s.ends_with(char::is_whitespace)
    })
}

/// Parse strikethrough (~~text~~).
pub fn strikethrough(input: &str) -> IResult<&str, Token<'_>> {
    delimited(
        tag("~~"),
        map(
            verify(take_until("~~"), |s: &str| !s.trim().is_empty()),
            Token::Strikethrough,
        ),
        tag("~~"),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading() {
        assert_eq!(
            heading("# Hello World"),
            Ok(("", Token::Heading(1, "Hello World")))
        );
        assert_eq!(
            heading("### Level 3 ###"),
            Ok(("", Token::Heading(3, "Level 3")))
        );
        assert!(heading("####### too deep").is_err());
        assert!(heading("#hashtag").is_err());
    }

    #[test]
    fn test_thematic_break() {
        assert!(thematic_break("---").is_ok());
        assert!(thematic_break("*****  ").is_ok());
        assert!(thematic_break("---abc").is_err());
        assert!(thematic_break("--").is_err());
    }

    #[test]
    fn test_fenced_code_start() {
        assert_eq!(
            fenced_code_start("```python"),
            Ok(("", Token::FencedCodeStart("python")))
        );
        assert_eq!(fenced_code_start("~~~"), Ok(("", Token::FencedCodeStart(""))));
    }

    #[test]
    fn test_list_markers() {
        assert_eq!(
            list_item_marker("- item"),
            Ok(("item", Token::ListItemMarker(ListMarker::Unordered)))
        );
        assert_eq!(
            list_item_marker("12. item"),
            Ok(("item", Token::ListItemMarker(ListMarker::Ordered(12))))
        );
        assert!(list_item_marker("-item").is_err());
        assert!(list_item_marker("3.14 is pi").is_err());
    }

    #[test]
    fn test_inline_tokens() {
        assert_eq!(strong("**bold** rest"), Ok((" rest", Token::Strong("bold"))));
        assert_eq!(emphasis("*it* rest"), Ok((" rest", Token::Emphasis("it"))));
        assert_eq!(inline_code("`x + 1`"), Ok(("", Token::InlineCode("x + 1"))));
        assert_eq!(strikethrough("~~old~~"), Ok(("", Token::Strikethrough("old"))));
        assert!(emphasis("* not emphasis*").is_err());
    }
}
