//! Server-side MathML conversion.

use super::MathRenderer;
use crate::error::Result;

/// Converts LaTeX to MathML with `latex2mathml`, so the browser needs no
/// script.
///
/// Without the `mathml` feature the converter is not compiled in and this
/// falls back to delimited LaTeX, like the client-side renderer.
#[derive(Debug, Default)]
pub struct MathMLRenderer;

impl MathMLRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "mathml")]
fn convert(latex: &str, display: bool) -> Result<String> {
    use crate::error::RenderError;
    use latex2mathml::{latex_to_mathml, DisplayStyle};

    let style = if display {
        DisplayStyle::Block
    } else {
        DisplayStyle::Inline
    };
    latex_to_mathml(latex, style).map_err(|e| RenderError::Math(e.to_string()).into())
}

#[cfg(not(feature = "mathml"))]
fn convert(latex: &str, display: bool) -> Result<String> {
    use super::katex::check_braces;
    use crate::render::escape_html;

    check_braces(latex)?;
    let escaped = escape_html(latex);
    Ok(if display {
        format!(r"\[{escaped}\]")
    } else {
        format!(r"\({escaped}\)")
    })
}

impl MathRenderer for MathMLRenderer {
    fn render_inline(&self, latex: &str) -> Result<String> {
        let math = convert(latex, false)?;
        Ok(format!(r#"<span class="math inline">{math}</span>"#))
    }

    fn render_display(&self, latex: &str) -> Result<String> {
        let math = convert(latex, true)?;
        Ok(format!(r#"<div class="math display">{math}</div>"#))
    }

    fn head_content(&self) -> Option<String> {
        Some(MATHML_STYLES.to_string())
    }
}

const MATHML_STYLES: &str = r#"<style>
math { font-size: 1.1em; }
math[display="block"] { overflow-x: auto; }
</style>"#;
