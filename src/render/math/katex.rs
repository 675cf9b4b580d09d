//! Client-side typesetting: emit delimited LaTeX for KaTeX or MathJax.

use super::MathRenderer;
use crate::error::{RenderError, Result};
use crate::render::escape_html;

/// Which browser library typesets the emitted LaTeX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientLibrary {
    KaTeX,
    MathJax,
}

/// Renderer that leaves typesetting to the browser.
///
/// Inline math becomes `\(...\)` and display math `\[...\]`; the head content
/// loads the library and registers exactly those delimiters. Source with
/// unbalanced braces is rejected, since the client would show an error box
/// in its place.
#[derive(Debug)]
pub struct ClientSideRenderer {
    library: ClientLibrary,
}

impl ClientSideRenderer {
    pub fn new(library: ClientLibrary) -> Self {
        Self { library }
    }

    pub fn library(&self) -> ClientLibrary {
        self.library
    }
}

impl MathRenderer for ClientSideRenderer {
    fn render_inline(&self, latex: &str) -> Result<String> {
        check_braces(latex)?;
        Ok(format!(
            r#"<span class="math inline">\({}\)</span>"#,
            escape_html(latex)
        ))
    }

    fn render_display(&self, latex: &str) -> Result<String> {
        check_braces(latex)?;
        Ok(format!(
            r#"<div class="math display">\[{}\]</div>"#,
            escape_html(latex)
        ))
    }

    fn head_content(&self) -> Option<String> {
        let head = match self.library {
            ClientLibrary::KaTeX => KATEX_HEAD,
            ClientLibrary::MathJax => MATHJAX_HEAD,
        };
        Some(head.to_string())
    }
}

/// Reject source whose `{`/`}` do not pair up. `\{` and `\}` are literal
/// braces and do not count.
pub(crate) fn check_braces(latex: &str) -> Result<()> {
    let mut depth = 0usize;
    let mut chars = latex.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| RenderError::Math(format!("unexpected '}}' in {latex:?}")))?;
            }
            _ => {}
        }
    }

    if depth > 0 {
        return Err(RenderError::Math(format!("{depth} unclosed '{{' in {latex:?}")).into());
    }
    Ok(())
}

const KATEX_HEAD: &str = r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css" crossorigin="anonymous">
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.js" crossorigin="anonymous"></script>
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/contrib/auto-render.min.js" crossorigin="anonymous"
    onload="renderMathInElement(document.body, {
        delimiters: [
            {left: '\\[', right: '\\]', display: true},
            {left: '\\(', right: '\\)', display: false}
        ],
        throwOnError: false
    });"></script>"#;

const MATHJAX_HEAD: &str = r#"<script>
MathJax = {
    tex: {
        inlineMath: [['\\(', '\\)']],
        displayMath: [['\\[', '\\]']],
        processEscapes: true
    }
};
</script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_inline_delimiters() {
        let renderer = ClientSideRenderer::new(ClientLibrary::KaTeX);
        let result = renderer.render_inline("E = mc^2").unwrap();
        assert_eq!(result, r#"<span class="math inline">\(E = mc^2\)</span>"#);
    }

    #[test]
    fn test_display_delimiters() {
        let renderer = ClientSideRenderer::new(ClientLibrary::MathJax);
        let result = renderer.render_display(r"\frac{a}{b} < 1").unwrap();
        assert_eq!(
            result,
            r#"<div class="math display">\[\frac{a}{b} &lt; 1\]</div>"#
        );
    }

    #[rstest]
    #[case(r"\frac{1}{2}", true)]
    #[case(r"\{x \mid x > 0\}", true)]
    #[case(r"\sqrt{x", false)]
    #[case(r"x}", false)]
    #[case(r"a_{i_{j}}", true)]
    fn test_check_braces(#[case] latex: &str, #[case] ok: bool) {
        assert_eq!(check_braces(latex).is_ok(), ok);
    }

    #[test]
    fn test_heads_differ() {
        let katex = ClientSideRenderer::new(ClientLibrary::KaTeX);
        let mathjax = ClientSideRenderer::new(ClientLibrary::MathJax);
        assert!(katex.head_content().unwrap().contains("auto-render"));
        assert!(mathjax.head_content().unwrap().contains("MathJax-script"));
    }
}
