//! HTML renderer for segmented content.

use tracing::{trace, warn};

use crate::ast::{Alignment, Block, Inline, Segment, SegmentKind, Table};
use crate::parser::{parse_blocks, parse_inlines};
use crate::render::config::{HtmlConfig, TextMode};
use crate::render::escape_html;
use crate::render::math::{create_renderer, MathRenderer};
use crate::segment::{has_markup, segment, segment_inline};

/// Renders content strings to HTML.
///
/// Holds the configuration and the math backend; rendering itself keeps no
/// state, so one renderer can serve any number of threads.
pub struct ContentRenderer {
    config: HtmlConfig,
    math: Box<dyn MathRenderer>,
}

impl Default for ContentRenderer {
    fn default() -> Self {
        Self::new(HtmlConfig::default())
    }
}

impl std::fmt::Debug for ContentRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRenderer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ContentRenderer {
    pub fn new(config: HtmlConfig) -> Self {
        Self {
            math: create_renderer(config.math_backend),
            config,
        }
    }

    pub fn config(&self) -> &HtmlConfig {
        &self.config
    }

    /// Render content, honouring `standalone`. Absent, empty or blank content
    /// renders to the empty string.
    pub fn render(&self, content: Option<&str>) -> String {
        let body = self.render_fragment(content);
        if self.config.standalone && !body.is_empty() {
            self.wrap_document(&body, None)
        } else {
            body
        }
    }

    /// Render content to an HTML fragment regardless of `standalone`.
    pub fn render_fragment(&self, content: Option<&str>) -> String {
        match content {
            Some(content) if !content.trim().is_empty() => {
                let segments = segment(content);
                trace!(prose_only = !has_markup(&segments), "rendering fragment");
                self.render_segments(&segments)
            }
            _ => String::new(),
        }
    }

    /// Render a precomputed segment list.
    ///
    /// Consecutive text and inline math segments are formatted as one flow,
    /// so markdown spans can straddle an equation.
    pub fn render_segments(&self, segments: &[Segment]) -> String {
        if segments.iter().all(Segment::is_blank) {
            return String::new();
        }

        let mut writer = HtmlWriter::new(self);
        writer.output.push_str(&format!(
            "<div class=\"{}content\">\n",
            self.config.class_prefix
        ));
        writer.write_segments(segments);
        writer.output.push_str("</div>\n");
        writer.finish()
    }

    /// Render a single inline math expression.
    pub fn render_inline_math(&self, latex: &str) -> String {
        match self.math.render_inline(latex) {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "inline math fell back to source");
                format!(
                    r#"<span class="{}math-fallback">${}$</span>"#,
                    self.config.class_prefix,
                    escape_html(latex)
                )
            }
        }
    }

    /// Render a single display math expression in its scrollable container.
    pub fn render_block_math(&self, latex: &str) -> String {
        let p = &self.config.class_prefix;
        match self.math.render_display(latex) {
            Ok(html) => format!("<div class=\"{p}block-math\">{html}</div>\n"),
            Err(e) => {
                warn!(error = %e, "display math fell back to source");
                format!(
                    "<div class=\"{p}block-math {p}math-fallback\">$${}$$</div>\n",
                    escape_html(latex)
                )
            }
        }
    }

    /// Render a table, e.g. one built from structured data with [`Table::new`].
    /// A table without columns renders to the empty string.
    pub fn render_table(&self, table: &Table) -> String {
        let mut writer = HtmlWriter::new(self);
        writer.write_table(table);
        writer.finish()
    }

    /// Wrap an HTML fragment in a complete document with math head content
    /// and the default stylesheet.
    pub fn wrap_document(&self, body: &str, title: Option<&str>) -> String {
        let title = title
            .or(self.config.title.as_deref())
            .unwrap_or("Lesson");

        let mut output = String::new();
        output.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        output.push_str("<meta charset=\"UTF-8\">\n");
        output.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        output.push_str(&format!("<title>{}</title>\n", escape_html(title)));

        // Math head content
        if let Some(head) = self.math.head_content() {
            output.push_str(&head);
            output.push('\n');
        }

        output.push_str(&self.stylesheet());

        // Custom CSS
        if let Some(ref css) = self.config.custom_css {
            output.push_str("<style>\n");
            output.push_str(css);
            output.push_str("\n</style>\n");
        }

        output.push_str("</head>\n<body>\n");
        output.push_str(&format!(
            "<article class=\"{}document\">\n",
            self.config.class_prefix
        ));
        output.push_str(body);
        output.push_str("</article>\n");
        output.push_str("</body>\n</html>");
        output
    }

    /// The default stylesheet for rendered content.
    pub fn stylesheet(&self) -> String {
        format!(
            r#"<style>
.{p}document {{ max-width: 860px; margin: 0 auto; padding: 2em; font-family: system-ui, sans-serif; line-height: 1.6; }}
.{p}content .math.inline {{ vertical-align: baseline; }}
.{p}block-math {{ margin: 1em 0; overflow-x: auto; overflow-y: hidden; text-align: center; }}
.{p}math-fallback {{ font-family: monospace; white-space: pre-wrap; }}
.{p}table-wrapper {{ margin: 1.5em 0; overflow-x: auto; }}
.{p}table {{ width: 100%; border-collapse: collapse; border: 1px solid #d0d7de; }}
.{p}table th, .{p}table td {{ padding: 0.5em 1em; border: 1px solid #d0d7de; text-align: left; }}
.{p}table thead tr {{ background: #e7f0fb; font-weight: 600; }}
.{p}table .{p}row-even {{ background: #f6f8fa; }}
.{p}content pre {{ padding: 1em; overflow-x: auto; background: #f6f8fa; border-radius: 6px; }}
.{p}content code {{ font-family: ui-monospace, monospace; font-size: 0.9em; }}
</style>
"#,
            p = self.config.class_prefix
        )
    }
}

/// Whether a flow is laid out as blocks (paragraphs, lists) or inline only
/// (table cells).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Block,
    Inline,
}

/// Inline math lifted out of a flow while its prose is formatted. Each
/// expression is stood in for by `{sentinel}{index}{sentinel}`.
struct Placeholders {
    sentinel: char,
    math: Vec<String>,
}

impl Placeholders {
    fn new(sentinel: char) -> Self {
        Self {
            sentinel,
            math: Vec::new(),
        }
    }

    /// Store an expression and return the token that stands in for it.
    fn push(&mut self, math: &str) -> String {
        let token = format!("{0}{1}{0}", self.sentinel, self.math.len());
        self.math.push(math.to_string());
        token
    }

    /// Split text into literal runs and the expressions its tokens refer to.
    fn pieces<'t>(&'t self, text: &'t str) -> impl Iterator<Item = Piece<'t>> {
        text.split(self.sentinel).enumerate().map(|(i, run)| {
            let math = (i % 2 == 1)
                .then(|| run.parse::<usize>().ok())
                .flatten()
                .and_then(|n| self.math.get(n));
            match math {
                Some(math) => Piece::Math(math),
                None => Piece::Literal(run),
            }
        })
    }

    /// Put the original `$...$` source back where a token sits, for text
    /// that is not rendered as markup (code, attributes).
    fn restore_source(&self, text: &str) -> String {
        self.pieces(text)
            .map(|piece| match piece {
                Piece::Literal(run) => run.to_string(),
                Piece::Math(math) => format!("${math}$"),
            })
            .collect()
    }
}

enum Piece<'t> {
    Literal(&'t str),
    Math(&'t str),
}

struct HtmlWriter<'a> {
    renderer: &'a ContentRenderer,
    output: String,
    placeholders: Option<Placeholders>,
}

impl<'a> HtmlWriter<'a> {
    fn new(renderer: &'a ContentRenderer) -> Self {
        Self {
            renderer,
            output: String::new(),
            placeholders: None,
        }
    }

    fn finish(self) -> String {
        self.output
    }

    fn prefix(&self) -> &'a str {
        &self.renderer.config.class_prefix
    }

    fn write_segments(&mut self, segments: &[Segment]) {
        let mut group: Vec<&SegmentKind> = Vec::new();

        for segment in segments {
            if segment.is_inline() {
                group.push(&segment.kind);
                continue;
            }

            self.write_flow(&group, Flow::Block);
            group.clear();

            match &segment.kind {
                SegmentKind::BlockMath { math } => {
                    let html = self.renderer.render_block_math(math);
                    self.output.push_str(&html);
                }
                SegmentKind::Table(table) => self.write_table(table),
                SegmentKind::Text { .. } | SegmentKind::InlineMath { .. } => {}
            }
        }

        self.write_flow(&group, Flow::Block);
    }

    /// Format text and inline math as one flow. Math is swapped for
    /// placeholder tokens before the prose is parsed; tokens are expanded
    /// only where they land in rendered text.
    fn write_flow(&mut self, parts: &[&SegmentKind], flow: Flow) {
        let plain: String = parts
            .iter()
            .filter_map(|part| match part {
                SegmentKind::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        let mut placeholders = Placeholders::new(placeholder_sentinel(&plain));

        let mut combined = String::with_capacity(plain.len());
        for part in parts {
            match part {
                SegmentKind::Text { text } => combined.push_str(text),
                SegmentKind::InlineMath { math } => combined.push_str(&placeholders.push(math)),
                SegmentKind::BlockMath { .. } | SegmentKind::Table(_) => {}
            }
        }

        if combined.trim().is_empty() {
            return;
        }

        let html = self.format_prose(&combined, flow, placeholders);
        self.output.push_str(&html);
    }

    fn format_prose(&self, text: &str, flow: Flow, placeholders: Placeholders) -> String {
        let mut writer = HtmlWriter::new(self.renderer);
        writer.placeholders = Some(placeholders);

        match (self.renderer.config.text_mode, flow) {
            (TextMode::Markdown, Flow::Block) => {
                for block in parse_blocks(text) {
                    writer.write_block(&block);
                }
            }
            (TextMode::Markdown, Flow::Inline) => {
                writer.write_inlines(&parse_inlines(text));
            }
            (TextMode::Plain, Flow::Block) => {
                writer.output.push_str(&format!("<p class=\"{}plain\">", self.prefix()));
                writer.write_plain(text.trim());
                writer.output.push_str("</p>\n");
            }
            (TextMode::Plain, Flow::Inline) => writer.write_plain(text),
        }

        writer.finish()
    }

    fn write_plain(&mut self, text: &str) {
        let mut lines = text.split('\n').peekable();
        while let Some(line) = lines.next() {
            self.write_text(line.trim_end_matches('\r'));
            if lines.peek().is_some() {
                self.output.push_str("<br>\n");
            }
        }
    }

    fn write_table(&mut self, table: &Table) {
        if table.column_count() == 0 {
            return;
        }
        let p = self.prefix();

        self.output
            .push_str(&format!("<div class=\"{p}table-wrapper\">\n<table class=\"{p}table\">\n"));

        // Header
        self.output.push_str("<thead>\n<tr>\n");
        for (i, cell) in table.headers.iter().enumerate() {
            let align = table.alignments.get(i).copied().unwrap_or_default();
            self.output.push_str(&format!("<th{}>", alignment_style(align)));
            self.write_cell(cell);
            self.output.push_str("</th>\n");
        }
        self.output.push_str("</tr>\n</thead>\n");

        // Body, striped
        self.output.push_str("<tbody>\n");
        for (r, row) in table.rows.iter().enumerate() {
            let stripe = if r % 2 == 0 { "row-even" } else { "row-odd" };
            self.output.push_str(&format!("<tr class=\"{p}{stripe}\">\n"));
            for i in 0..table.column_count() {
                let align = table.alignments.get(i).copied().unwrap_or_default();
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                self.output.push_str(&format!("<td{}>", alignment_style(align)));
                self.write_cell(cell);
                self.output.push_str("</td>\n");
            }
            self.output.push_str("</tr>\n");
        }
        self.output.push_str("</tbody>\n</table>\n</div>\n");
    }

    fn write_cell(&mut self, cell: &str) {
        let segments = segment_inline(cell);
        let parts: Vec<&SegmentKind> = segments.iter().map(|s| &s.kind).collect();
        self.write_flow(&parts, Flow::Inline);
    }

    fn write_block(&mut self, block: &Block) {
        match block {
            Block::Paragraph(inlines) => {
                self.output.push_str("<p>");
                self.write_inlines(inlines);
                self.output.push_str("</p>\n");
            }
            Block::Heading { level, content } => {
                self.output.push_str(&format!("<h{}>", level));
                self.write_inlines(content);
                self.output.push_str(&format!("</h{}>\n", level));
            }
            Block::CodeBlock { language, content } => {
                self.output.push_str("<pre><code");
                if let Some(lang) = language {
                    let lang = self.source(lang);
                    self.output
                        .push_str(&format!(r#" class="language-{}""#, escape_html(&lang)));
                }
                self.output.push('>');
                let content = self.source(content);
                self.output.push_str(&escape_html(&content));
                self.output.push_str("</code></pre>\n");
            }
            Block::ThematicBreak => {
                self.output.push_str("<hr>\n");
            }
            Block::BlockQuote(blocks) => {
                self.output.push_str("<blockquote>\n");
                for block in blocks {
                    self.write_block(block);
                }
                self.output.push_str("</blockquote>\n");
            }
            Block::List {
                ordered,
                start,
                items,
            } => {
                let tag = if *ordered { "ol" } else { "ul" };
                self.output.push('<');
                self.output.push_str(tag);
                if let Some(start) = start.filter(|&n| n != 1) {
                    self.output.push_str(&format!(r#" start="{}""#, start));
                }
                self.output.push_str(">\n");

                for item in items {
                    self.output.push_str("<li>");
                    match item.content.as_slice() {
                        // Inline single paragraphs in list items
                        [Block::Paragraph(inlines)] => self.write_inlines(inlines),
                        blocks => {
                            for block in blocks {
                                self.write_block(block);
                            }
                        }
                    }
                    self.output.push_str("</li>\n");
                }

                self.output.push_str(&format!("</{}>\n", tag));
            }
        }
    }

    fn write_inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            self.write_inline(inline);
        }
    }

    fn write_inline(&mut self, inline: &Inline) {
        match inline {
            Inline::Text(text) => self.write_text(text),
            Inline::Emphasis(inlines) => {
                self.output.push_str("<em>");
                self.write_inlines(inlines);
                self.output.push_str("</em>");
            }
            Inline::Strong(inlines) => {
                self.output.push_str("<strong>");
                self.write_inlines(inlines);
                self.output.push_str("</strong>");
            }
            Inline::Strikethrough(inlines) => {
                self.output.push_str("<del>");
                self.write_inlines(inlines);
                self.output.push_str("</del>");
            }
            Inline::Code(code) => {
                let code = self.source(code);
                self.output.push_str("<code>");
                self.output.push_str(&escape_html(&code));
                self.output.push_str("</code>");
            }
            Inline::Link {
                url,
                title,
                content,
            } => {
                let url = self.source(url);
                if !is_safe_url(&url) {
                    self.write_inlines(content);
                    return;
                }
                self.output
                    .push_str(&format!(r#"<a href="{}""#, escape_html(&url)));
                if let Some(title) = title {
                    let title = self.source(title);
                    self.output
                        .push_str(&format!(r#" title="{}""#, escape_html(&title)));
                }
                self.output.push('>');
                self.write_inlines(content);
                self.output.push_str("</a>");
            }
            Inline::SoftBreak => {
                self.output.push('\n');
            }
            Inline::HardBreak => {
                self.output.push_str("<br>\n");
            }
        }
    }

    /// Escape text, rendering any inline math tokens in it.
    fn write_text(&mut self, text: &str) {
        let Some(placeholders) = &self.placeholders else {
            self.output.push_str(&escape_html(text));
            return;
        };
        for piece in placeholders.pieces(text) {
            match piece {
                Piece::Literal(run) => self.output.push_str(&escape_html(run)),
                Piece::Math(math) => self.output.push_str(&self.renderer.render_inline_math(math)),
            }
        }
    }

    /// Text that is shown verbatim, with inline math tokens turned back into
    /// their source.
    fn source(&self, text: &str) -> String {
        match &self.placeholders {
            Some(placeholders) => placeholders.restore_source(text),
            None => text.to_string(),
        }
    }
}

/// Pick a private-use character that does not occur in `text`, so the
/// placeholder tokens built from it cannot collide with content.
fn placeholder_sentinel(text: &str) -> char {
    ('\u{E000}'..='\u{F8FF}')
        .find(|c| !text.contains(*c))
        .unwrap_or('\u{E000}')
}

/// Links to `javascript:` and other schemes are rendered as plain text.
fn is_safe_url(url: &str) -> bool {
    match url.trim().split_once(':') {
        Some((scheme, _)) if !scheme.contains(['/', '?', '#']) => matches!(
            scheme.to_ascii_lowercase().as_str(),
            "http" | "https" | "mailto"
        ),
        _ => true,
    }
}

fn alignment_style(align: Alignment) -> &'static str {
    match align {
        Alignment::Left => "",
        Alignment::Center => r#" style="text-align: center""#,
        Alignment::Right => r#" style="text-align: right""#,
    }
}
