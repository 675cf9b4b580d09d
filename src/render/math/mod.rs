//! Math rendering backends.

mod katex;
mod mathml;

pub use self::katex::{ClientLibrary, ClientSideRenderer};
pub use self::mathml::MathMLRenderer;

use serde::Deserialize;

use crate::error::Result;

/// Math rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathBackend {
    /// Output raw LaTeX for KaTeX to render client-side.
    #[default]
    #[serde(alias = "KaTeX")]
    KaTeX,
    /// Convert to MathML for native browser rendering.
    #[serde(alias = "MathML")]
    MathML,
    /// Output raw LaTeX for MathJax to render client-side.
    #[serde(alias = "MathJax")]
    MathJax,
}

impl MathBackend {
    /// Parse a backend name, falling back to KaTeX for unknown names.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "mathml" => Self::MathML,
            "mathjax" => Self::MathJax,
            _ => Self::KaTeX,
        }
    }
}

/// Trait for math renderers.
pub trait MathRenderer: Send + Sync {
    /// Render an expression that flows inline with text.
    fn render_inline(&self, latex: &str) -> Result<String>;

    /// Render an expression displayed on its own.
    fn render_display(&self, latex: &str) -> Result<String>;

    /// Get any required HTML head content (scripts, styles).
    fn head_content(&self) -> Option<String>;
}

/// Create a math renderer for the given backend.
pub fn create_renderer(backend: MathBackend) -> Box<dyn MathRenderer> {
    match backend {
        MathBackend::KaTeX => Box::new(ClientSideRenderer::new(ClientLibrary::KaTeX)),
        MathBackend::MathJax => Box::new(ClientSideRenderer::new(ClientLibrary::MathJax)),
        MathBackend::MathML => Box::new(MathMLRenderer::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_name() {
        assert_eq!(MathBackend::from_name("MathJax"), MathBackend::MathJax);
        assert_eq!(MathBackend::from_name("mathml"), MathBackend::MathML);
        assert_eq!(MathBackend::from_name("unknown"), MathBackend::KaTeX);
    }

    #[test]
    fn test_create_renderer_heads() {
        let katex = create_renderer(MathBackend::KaTeX);
        assert!(katex.head_content().unwrap().contains("katex"));
        let mathjax = create_renderer(MathBackend::MathJax);
        assert!(mathjax.head_content().unwrap().contains("MathJax"));
    }
}
