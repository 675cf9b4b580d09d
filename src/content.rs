//! Typed payloads whose free-form fields are rendered by the engine.
//!
//! These mirror the JSON returned by the tutoring API for solved questions
//! and topic lessons. Every content-bearing field goes through
//! [`ContentRenderer`]; plain labels such as step descriptions and topic
//! names are only escaped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PayloadError, Result};
use crate::render::{escape_html, ContentRenderer};

/// One numbered step of a worked solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionStep {
    pub step_number: u32,
    pub description: String,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub explanation: String,
}

/// A solved question with its worked steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSolution {
    pub question_id: u64,
    pub question_text: String,
    pub subject: String,
    pub topic: String,
    pub solution: String,
    #[serde(default)]
    pub steps: Vec<SolutionStep>,
    #[serde(default)]
    pub related_topics: Vec<String>,
    #[serde(default)]
    pub similar_questions: Vec<String>,
}

/// A generated lesson for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicLesson {
    pub subject: String,
    pub topic: String,
    pub summary: String,
    pub detailed_explanation: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub practice_questions: Vec<String>,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    #[serde(default)]
    pub common_mistakes: Vec<String>,
    #[serde(default)]
    pub exam_tips: Vec<String>,
    #[serde(default)]
    pub video_link: Option<String>,
}

fn require(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PayloadError::MissingField(field).into());
    }
    Ok(())
}

fn decode<T: for<'de> Deserialize<'de>>(json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|e| PayloadError::Json(e).into())
}

impl QuestionSolution {
    /// Decode and validate a solution payload.
    pub fn from_json(json: &str) -> Result<Self> {
        let solution: Self = decode(json)?;
        solution.validate()?;
        debug!(
            question_id = solution.question_id,
            steps = solution.steps.len(),
            "decoded solution"
        );
        Ok(solution)
    }

    /// Check that subject and topic are present and no step number repeats.
    /// Numbering may start anywhere; steps are shown in ascending order.
    pub fn validate(&self) -> Result<()> {
        require(&self.subject, "subject")?;
        require(&self.topic, "topic")?;

        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.step_number) {
                return Err(PayloadError::DuplicateStep(step.step_number).into());
            }
        }

        Ok(())
    }

    /// Render the question, solution, steps in order and related material.
    pub fn to_html(&self, renderer: &ContentRenderer) -> String {
        let p = &renderer.config().class_prefix;
        let mut out = format!("<article class=\"{p}solution\">\n");

        out.push_str(&format!(
            "<p class=\"{p}subject\">{} &middot; {}</p>\n",
            escape_html(&self.subject),
            escape_html(&self.topic)
        ));
        section(&mut out, p, "question", "Question", &renderer.render_fragment(Some(&self.question_text)));
        section(&mut out, p, "answer", "Solution", &renderer.render_fragment(Some(&self.solution)));

        if !self.steps.is_empty() {
            let mut steps: Vec<&SolutionStep> = self.steps.iter().collect();
            steps.sort_by_key(|s| s.step_number);

            let mut body = format!("<ol class=\"{p}step-list\">\n");
            for step in steps {
                body.push_str(&format!(
                    "<li class=\"{p}step\" value=\"{}\">\n<p class=\"{p}step-description\">{}</p>\n",
                    step.step_number,
                    escape_html(&step.description)
                ));
                if let Some(formula) = step.formula.as_deref().filter(|f| !f.trim().is_empty()) {
                    body.push_str(&format!(
                        "<div class=\"{p}step-formula\">\n{}</div>\n",
                        renderer.render_fragment(Some(formula))
                    ));
                }
                body.push_str(&renderer.render_fragment(Some(&step.explanation)));
                body.push_str("</li>\n");
            }
            body.push_str("</ol>\n");
            section(&mut out, p, "steps", "Step-by-step", &body);
        }

        if !self.related_topics.is_empty() {
            let mut body = format!("<ul class=\"{p}tags\">\n");
            for topic in &self.related_topics {
                body.push_str(&format!("<li>{}</li>\n", escape_html(topic)));
            }
            body.push_str("</ul>\n");
            section(&mut out, p, "related", "Related topics", &body);
        }

        list_section(&mut out, renderer, "similar", "Similar questions", &self.similar_questions);

        out.push_str("</article>\n");
        finish(renderer, out, &self.topic)
    }
}

impl TopicLesson {
    /// Decode and validate a lesson payload.
    pub fn from_json(json: &str) -> Result<Self> {
        let lesson: Self = decode(json)?;
        lesson.validate()?;
        debug!(topic = %lesson.topic, examples = lesson.examples.len(), "decoded lesson");
        Ok(lesson)
    }

    pub fn validate(&self) -> Result<()> {
        require(&self.subject, "subject")?;
        require(&self.topic, "topic")
    }

    /// Render every lesson field in reading order.
    pub fn to_html(&self, renderer: &ContentRenderer) -> String {
        let p = &renderer.config().class_prefix;
        let mut out = format!("<article class=\"{p}lesson\">\n");

        out.push_str(&format!(
            "<h1>{}</h1>\n<p class=\"{p}subject\">{}</p>\n",
            escape_html(&self.topic),
            escape_html(&self.subject)
        ));
        section(&mut out, p, "summary", "Summary", &renderer.render_fragment(Some(&self.summary)));
        section(
            &mut out,
            p,
            "explanation",
            "Detailed explanation",
            &renderer.render_fragment(Some(&self.detailed_explanation)),
        );
        list_section(&mut out, renderer, "key-concepts", "Key concepts", &self.key_concepts);

        if !self.examples.is_empty() {
            let mut body = String::new();
            for (i, example) in self.examples.iter().enumerate() {
                body.push_str(&format!(
                    "<div class=\"{p}example\">\n<h3>Example {}</h3>\n{}</div>\n",
                    i + 1,
                    renderer.render_fragment(Some(example))
                ));
            }
            section(&mut out, p, "examples", "Worked examples", &body);
        }

        list_section(&mut out, renderer, "mistakes", "Common mistakes", &self.common_mistakes);
        list_section(&mut out, renderer, "tips", "Exam tips", &self.exam_tips);
        list_section(&mut out, renderer, "practice", "Practice questions", &self.practice_questions);

        if let Some(link) = self.video_link.as_deref().filter(|l| is_web_link(l)) {
            out.push_str(&format!(
                "<p class=\"{p}video\"><a href=\"{}\">Watch a video on this topic</a></p>\n",
                escape_html(link)
            ));
        }

        out.push_str("</article>\n");
        finish(renderer, out, &self.topic)
    }
}

fn is_web_link(link: &str) -> bool {
    let link = link.trim().to_ascii_lowercase();
    link.starts_with("https://") || link.starts_with("http://")
}

fn section(out: &mut String, prefix: &str, class: &str, title: &str, body: &str) {
    if body.is_empty() {
        return;
    }
    out.push_str(&format!(
        "<section class=\"{prefix}{class}\">\n<h2>{title}</h2>\n{body}</section>\n"
    ));
}

/// A titled list whose items are each rendered as content.
fn list_section(
    out: &mut String,
    renderer: &ContentRenderer,
    class: &str,
    title: &str,
    items: &[String],
) {
    let rendered: Vec<String> = items
        .iter()
        .map(|item| renderer.render_fragment(Some(item)))
        .filter(|html| !html.is_empty())
        .collect();
    if rendered.is_empty() {
        return;
    }

    let mut body = String::from("<ol>\n");
    for html in rendered {
        body.push_str("<li>\n");
        body.push_str(&html);
        body.push_str("</li>\n");
    }
    body.push_str("</ol>\n");
    section(out, &renderer.config().class_prefix, class, title, &body);
}

fn finish(renderer: &ContentRenderer, body: String, title: &str) -> String {
    if renderer.config().standalone {
        let title = renderer.config().title.as_deref().unwrap_or(title);
        renderer.wrap_document(&body, Some(title))
    } else {
        body
    }
}
