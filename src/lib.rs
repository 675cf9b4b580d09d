//! # tutor-content
//!
//! Segmentation and HTML rendering for tutoring content: prose with inline
//! `$...$` math, display `$$...$$` math and markdown pipe tables.
//!
//! Content arrives as free-form strings produced by a language model, so
//! nothing here fails on malformed input: unbalanced delimiters stay text,
//! broken tables stay text, and a math expression the backend rejects is
//! shown as its literal source.
//!
//! ## Quick Start
//!
//! ```rust
//! use tutor_content::{render, segment, SegmentKind};
//!
//! let content = "The roots of $x^2 - 1$ are:\n$$x = \\pm 1$$";
//!
//! let segments = segment(content);
//! assert!(matches!(segments[1].kind, SegmentKind::InlineMath { .. }));
//!
//! let html = render(Some(content), None);
//! assert!(html.contains("tc-block-math"));
//! ```
//!
//! ## Syntax Reference
//!
//! ### Math
//!
//! - Inline: `$E = mc^2$` (single line, non-empty)
//! - Display: `$$\int_0^1 x\,dx$$` (may span lines)
//!
//! Display math is matched first, then tables. Inline math pairs `$` signs
//! left to right over the whole input, and any pair that touches display
//! math or a table is dropped, so `$$a$$` is never read as two inline
//! expressions.
//!
//! ### Tables
//!
//! ```text
//! | Quantity | Unit |
//! |:---------|-----:|
//! | Force    | $N$  |
//! ```
//!
//! A header row, a delimiter row of pipes, dashes and colons, and at least one
//! body row. Colons in the delimiter row set column alignment.
//!
//! ### Prose
//!
//! Text between math and tables is formatted as markdown by default:
//! headings, emphasis, strong, strikethrough, code, links, lists, block
//! quotes and fenced code. Raw HTML is escaped. Emphasis may wrap an
//! equation, as in `**area $A$ here**`.
//!
//! ## Configuration
//!
//! [`HtmlConfig`] selects the math backend, prose mode, standalone output and
//! class prefix, and can be loaded from TOML with [`HtmlConfig::from_file`].
//!
//! ## FFI
//!
//! The library provides a C-compatible FFI. See the `ffi` module
//! documentation for details.
//!
//! ## Features
//!
//! - `mathml`: Enable MathML rendering backend (requires `latex2mathml` crate)
//! - `wasm`: Enable WebAssembly bindings (requires `wasm-bindgen`)
//! - `cli`: Build the `tutor-render` command-line tool

pub mod ast;
pub mod content;
pub mod error;
pub mod parser;
pub mod render;
pub mod segment;

// FFI module (always compiled for cdylib)
#[cfg(not(target_arch = "wasm32"))]
pub mod ffi;

// WASM module (only with feature)
#[cfg(feature = "wasm")]
pub mod wasm;

// Convenience re-exports
pub use ast::{Alignment, Segment, SegmentKind, Span, Table};
pub use content::{QuestionSolution, SolutionStep, TopicLesson};
pub use error::{ConfigError, Error, PayloadError, RenderError, Result};
pub use render::{render_html, ContentRenderer, HtmlConfig, MathBackend, TextMode};
pub use segment::segment;

/// Segment and render content to HTML in one step.
///
/// Absent or empty content renders to the empty string.
///
/// # Example
///
/// ```rust
/// use tutor_content::render;
///
/// let html = render(Some("Speed is $v = d/t$."), None);
/// assert!(html.contains("math inline"));
/// assert_eq!(render(None, None), "");
/// ```
pub fn render(content: Option<&str>, config: Option<&HtmlConfig>) -> String {
    match config {
        Some(config) => render_html(content, config),
        None => ContentRenderer::default().render(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pipeline() {
        let input = r#"## Projectile motion

A ball is thrown with speed $u$ at angle $\theta$. Its range is

$$R = \frac{u^2 \sin 2\theta}{g}$$

| Angle | Range |
|:-----:|------:|
| $30^\circ$ | $0.87 u^2/g$ |
| $45^\circ$ | $u^2/g$ |

Maximum range is at **$45^\circ$**.
"#;

        let html = render(Some(input), None);

        assert!(html.contains("<h2>Projectile motion</h2>"));
        assert_eq!(html.matches("tc-block-math").count(), 1);
        assert_eq!(html.matches("tc-table-wrapper").count(), 1);
        assert!(html.contains(r#"<strong><span class="math inline">\(45^\circ\)</span></strong>"#));
        assert!(!html.contains('$'));
    }

    #[test]
    fn test_standalone_pipeline() {
        let config = HtmlConfig {
            standalone: true,
            ..Default::default()
        };
        let html = render(Some("Hello"), Some(&config));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("katex"));
    }

    #[test]
    fn test_literal_dollar_survives() {
        let html = render(Some("It costs $5."), None);
        assert!(html.contains("It costs $5."));
        assert!(!html.contains("math inline"));
    }
}
