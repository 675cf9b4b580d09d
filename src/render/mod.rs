//! Rendering layer for converting segmented content to HTML.

pub mod config;
pub mod html;
pub mod math;

pub use config::{HtmlConfig, TextMode};
pub use html::ContentRenderer;
pub use math::{MathBackend, MathRenderer};

/// Render content to HTML with the given configuration.
pub fn render_html(content: Option<&str>, config: &HtmlConfig) -> String {
    ContentRenderer::new(config.clone()).render(content)
}

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
