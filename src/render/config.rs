//! Renderer configuration, loadable from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::render::math::MathBackend;

/// How prose segments are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    /// Run prose through the markdown formatter.
    #[default]
    Markdown,
    /// Escape prose literally, turning newlines into `<br>`.
    Plain,
}

/// Configuration for HTML rendering.
///
/// ```toml
/// math_backend = "mathjax"
/// text_mode = "markdown"
/// standalone = true
/// title = "Quadratic equations"
/// class_prefix = "lesson-"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Math rendering backend.
    pub math_backend: MathBackend,
    /// How prose between math and tables is formatted.
    pub text_mode: TextMode,
    /// Whether to generate a complete HTML document or just the fragment.
    pub standalone: bool,
    /// Document title (for standalone mode).
    pub title: Option<String>,
    /// Additional CSS to include (for standalone mode).
    pub custom_css: Option<String>,
    /// CSS class prefix for styling.
    pub class_prefix: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            math_backend: MathBackend::KaTeX,
            text_mode: TextMode::Markdown,
            standalone: false,
            title: None,
            custom_css: None,
            class_prefix: "tc-".to_string(),
        }
    }
}

impl HtmlConfig {
    /// Parse a configuration from TOML source. Missing keys take defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| ConfigError::Toml(e.to_string()).into())
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }
}
