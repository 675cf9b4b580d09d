//! WebAssembly bindings for JavaScript/TypeScript.

#![cfg(feature = "wasm")]

use crate::content::{QuestionSolution, TopicLesson};
use crate::render::{ContentRenderer, HtmlConfig, MathBackend, TextMode};
use crate::segment::segment;
use wasm_bindgen::prelude::*;

/// Render a content string to HTML.
///
/// `null`, `undefined` and the empty string all render to `""`.
#[wasm_bindgen(js_name = renderContent)]
pub fn render_content(content: Option<String>, options: Option<RenderOptions>) -> String {
    renderer(options).render(content.as_deref())
}

/// Segment a content string, returning an array of segment objects.
#[wasm_bindgen(js_name = segmentContent)]
pub fn segment_content(content: &str) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&segment(content)).map_err(|e| JsError::new(&e.to_string()))
}

/// Decode a solution payload (JSON text) and render it.
#[wasm_bindgen(js_name = renderSolution)]
pub fn render_solution(json: &str, options: Option<RenderOptions>) -> Result<String, JsError> {
    let solution = QuestionSolution::from_json(json).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(solution.to_html(&renderer(options)))
}

/// Decode a lesson payload (JSON text) and render it.
#[wasm_bindgen(js_name = renderLesson)]
pub fn render_lesson(json: &str, options: Option<RenderOptions>) -> Result<String, JsError> {
    let lesson = TopicLesson::from_json(json).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(lesson.to_html(&renderer(options)))
}

fn renderer(options: Option<RenderOptions>) -> ContentRenderer {
    let config = options.map(|o| o.to_html_config()).unwrap_or_default();
    ContentRenderer::new(config)
}

/// Configuration options for rendering.
#[wasm_bindgen]
pub struct RenderOptions {
    math_backend: String,
    plain_text: bool,
    standalone: bool,
    title: Option<String>,
    custom_css: Option<String>,
    class_prefix: Option<String>,
}

#[wasm_bindgen]
impl RenderOptions {
    /// Create a new options object with defaults.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            math_backend: "katex".to_string(),
            plain_text: false,
            standalone: false,
            title: None,
            custom_css: None,
            class_prefix: None,
        }
    }

    /// Set the math rendering backend: "katex", "mathjax", or "mathml".
    #[wasm_bindgen(js_name = setMathBackend)]
    pub fn set_math_backend(&mut self, backend: &str) {
        self.math_backend = backend.to_lowercase();
    }

    /// Escape prose literally instead of formatting it as markdown.
    #[wasm_bindgen(js_name = setPlainText)]
    pub fn set_plain_text(&mut self, plain: bool) {
        self.plain_text = plain;
    }

    /// Set whether to generate a complete HTML document.
    #[wasm_bindgen(js_name = setStandalone)]
    pub fn set_standalone(&mut self, standalone: bool) {
        self.standalone = standalone;
    }

    /// Set the document title (for standalone mode).
    #[wasm_bindgen(js_name = setTitle)]
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Set custom CSS to include.
    #[wasm_bindgen(js_name = setCustomCss)]
    pub fn set_custom_css(&mut self, css: &str) {
        self.custom_css = Some(css.to_string());
    }

    /// Set the CSS class prefix.
    #[wasm_bindgen(js_name = setClassPrefix)]
    pub fn set_class_prefix(&mut self, prefix: &str) {
        self.class_prefix = Some(prefix.to_string());
    }

    fn to_html_config(&self) -> HtmlConfig {
        let defaults = HtmlConfig::default();
        HtmlConfig {
            math_backend: MathBackend::from_name(&self.math_backend),
            text_mode: if self.plain_text {
                TextMode::Plain
            } else {
                TextMode::Markdown
            },
            standalone: self.standalone,
            title: self.title.clone(),
            custom_css: self.custom_css.clone(),
            class_prefix: self.class_prefix.clone().unwrap_or(defaults.class_prefix),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the library version.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// TypeScript type definitions for documentation
/// ```typescript
/// // tutor_content.d.ts
///
/// export function renderContent(content?: string | null, options?: RenderOptions): string;
///
/// export type Segment =
///     | { type: "text"; span: { start: number; end: number }; text: string }
///     | { type: "inline-math"; span: { start: number; end: number }; math: string }
///     | { type: "block-math"; span: { start: number; end: number }; math: string }
///     | { type: "table"; span: { start: number; end: number }; headers: string[];
///         alignments: ("left" | "center" | "right")[]; rows: string[][] };
///
/// export function segmentContent(content: string): Segment[];
/// export function renderSolution(json: string, options?: RenderOptions): string;
/// export function renderLesson(json: string, options?: RenderOptions): string;
/// export function getVersion(): string;
///
/// export class RenderOptions {
///     constructor();
///     setMathBackend(backend: "katex" | "mathjax" | "mathml"): void;
///     setPlainText(plain: boolean): void;
///     setStandalone(standalone: boolean): void;
///     setTitle(title: string): void;
///     setCustomCss(css: string): void;
///     setClassPrefix(prefix: string): void;
/// }
/// ```
const _: () = ();
