//! Markdown processing pipelines.
//!
//! Two independent transformations share one parser configuration: the
//! render pipeline ([`MarkdownRenderer`]) produces the HTML fragment served
//! to readers, and the search-text pipeline ([`extract_search_text`])
//! produces the plain text fed to the search index. They diverge on
//! purpose: rendered HTML must preserve code and embedded markup, search
//! text must never contain either.

pub mod highlight;
pub mod search_text;

use crate::slug::slugify;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

pub use search_text::extract_search_text;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("syntax highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),
}

/// Parser options shared by both pipelines (GFM extensions).
pub(crate) fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// Markdown-to-HTML renderer.
///
/// Stage order is a correctness requirement: heading ids must exist before
/// anchors reference them, and highlighting replaces code-block events that
/// earlier stages must still see in tree form.
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            options: parser_options(),
        }
    }

    /// Render a markdown body to a self-contained HTML fragment.
    ///
    /// Raw HTML embedded in the source passes through opaque; headings get
    /// deterministic unique ids and a prepended self-link anchor; fenced
    /// code blocks are syntax highlighted.
    pub fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();

        let ids = assign_heading_ids(&events);
        let events = attach_heading_ids(events, &ids);
        let events = add_heading_anchors(events);
        let events = highlight::highlight_code_blocks(events)?;

        let mut output = String::new();
        html::push_html(&mut output, events.into_iter());
        Ok(output)
    }

    /// Render with the pipeline failure boundary applied: a stage error is
    /// logged against the source file and replaced by a visible error
    /// fragment so one broken page never aborts a generation run.
    pub fn render_or_fallback(&self, markdown: &str, source: &Path) -> String {
        match self.render(markdown) {
            Ok(html) => html,
            Err(err) => {
                tracing::error!("Failed to render {}: {}", source.display(), err);
                format!(
                    "<p class=\"render-error\">This page could not be rendered: {}</p>",
                    html_escape(&err.to_string())
                )
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute one unique, URL-safe id per heading, in document order.
///
/// Ids derive from the heading text; collisions get a numeric suffix
/// (`overview`, `overview-1`, ...) so repeated builds stay stable.
fn assign_heading_ids(events: &[Event]) -> Vec<String> {
    let mut ids = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut current: Option<String> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { .. }) => current = Some(String::new()),
            Event::Text(text) | Event::Code(text) => {
                if let Some(buf) = current.as_mut() {
                    buf.push_str(text.as_ref());
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(text) = current.take() {
                    let mut base = slugify(&text);
                    if base.is_empty() {
                        base = "section".to_string();
                    }

                    let mut n = counters.get(&base).copied().unwrap_or(0);
                    let mut candidate = if n == 0 {
                        base.clone()
                    } else {
                        format!("{}-{}", base, n)
                    };
                    while taken.contains(&candidate) {
                        n += 1;
                        candidate = format!("{}-{}", base, n);
                    }
                    counters.insert(base, n + 1);
                    taken.insert(candidate.clone());
                    ids.push(candidate);
                }
            }
            _ => {}
        }
    }

    ids
}

/// Attach the computed ids to heading start tags.
///
/// An explicit id from heading attributes (`{#custom}`) wins; the computed
/// id for that heading is consumed but unused.
fn attach_heading_ids<'a>(events: Vec<Event<'a>>, ids: &[String]) -> Vec<Event<'a>> {
    let mut id_iter = ids.iter();
    let mut result = Vec::with_capacity(events.len());

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let computed = id_iter.next();
                let id = id.or_else(|| computed.map(|s| CowStr::from(s.clone())));
                result.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }
            other => result.push(other),
        }
    }

    result
}

/// Prepend a self-link anchor inside each heading.
///
/// The anchor is decorative: hidden from assistive technology and removed
/// from the tab order. Prepending (rather than wrapping the heading in a
/// link) keeps hand-written links inside heading text from nesting.
fn add_heading_anchors(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut result = Vec::with_capacity(events.len());

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let anchor = id.as_ref().map(|id| {
                    format!(
                        "<a class=\"anchor\" href=\"#{}\" aria-hidden=\"true\" tabindex=\"-1\"></a>",
                        html_escape(id)
                    )
                });
                result.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
                if let Some(anchor) = anchor {
                    result.push(Event::InlineHtml(CowStr::from(anchor)));
                }
            }
            other => result.push(other),
        }
    }

    result
}

pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
