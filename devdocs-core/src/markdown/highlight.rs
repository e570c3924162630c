//! Fenced code block highlighting using syntect.

use crate::markdown::html_escape;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::html::{ClassedHTMLGenerator, ClassStyle};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Token spans carry `language-`-prefixed scope classes so one stylesheet
/// covers every language (`<span class="language-source language-js">`).
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "language-" };

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Replace code-block event runs with highlighted HTML.
///
/// The declared language comes from the first token of the fence info
/// string. Unknown or missing languages render as plain escaped code
/// rather than failing the build.
pub(crate) fn highlight_code_blocks(events: Vec<Event<'_>>) -> Result<Vec<Event<'_>>, syntect::Error> {
    let mut result = Vec::with_capacity(events.len());
    let mut block: Option<(Option<String>, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match &kind {
                    CodeBlockKind::Fenced(info) => fence_language(info),
                    CodeBlockKind::Indented => None,
                };
                block = Some((lang, String::new()));
            }
            Event::Text(text) if block.is_some() => {
                if let Some((_, buffer)) = block.as_mut() {
                    buffer.push_str(text.as_ref());
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((lang, code)) = block.take() {
                    let html = render_code_block(lang.as_deref(), &code)?;
                    result.push(Event::Html(CowStr::from(html)));
                }
            }
            other => result.push(other),
        }
    }

    Ok(result)
}

/// First token of a fence info string (` ```js linenos ` -> `js`).
fn fence_language(info: &str) -> Option<String> {
    let token = info.split_whitespace().next()?.split(',').next()?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn render_code_block(lang: Option<&str>, code: &str) -> Result<String, syntect::Error> {
    let Some(lang) = lang else {
        return Ok(plain_code_block(None, code));
    };

    let set = syntax_set();
    let Some(syntax) = set
        .find_syntax_by_token(lang)
        .or_else(|| set.find_syntax_by_extension(lang))
    else {
        return Ok(plain_code_block(Some(lang), code));
    };

    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, set, CLASS_STYLE);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }

    Ok(format!(
        "<pre class=\"highlight\"><code class=\"language-{}\">{}</code></pre>\n",
        html_escape(lang),
        generator.finalize()
    ))
}

fn plain_code_block(lang: Option<&str>, code: &str) -> String {
    match lang {
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            html_escape(lang),
            html_escape(code)
        ),
        None => format!("<pre><code>{}</code></pre>\n", html_escape(code)),
    }
}
