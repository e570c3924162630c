//! Plain-text extraction for the search corpus.
//!
//! A separate walk over the same parse, not a flag on the render pipeline:
//! search text must never contain source code or script payloads, while
//! rendered HTML must preserve both.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Flatten a markdown body into whitespace-normalized indexable text.
///
/// Code blocks are dropped whole. Raw HTML loses its tags; `<script>` and
/// `<pre>` elements are dropped with their entire contents, even when the
/// parser delivers them split across several HTML events.
pub fn extract_search_text(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, crate::markdown::parser_options());

    let mut text = String::new();
    let mut in_code_block = false;
    let mut raw_html = RawHtmlText::new();

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(_) if in_code_block => {}
            Event::Text(chunk) => {
                text.push_str(chunk.as_ref());
                text.push(' ');
            }
            // Inline code is prose-adjacent (`run devdocs build`) and stays
            // searchable; only block-level code is noise.
            Event::Code(chunk) => {
                text.push_str(chunk.as_ref());
                text.push(' ');
            }
            Event::Html(chunk) | Event::InlineHtml(chunk) => {
                raw_html.append_text(chunk.as_ref(), &mut text);
            }
            Event::SoftBreak | Event::HardBreak | Event::Rule => text.push(' '),
            Event::End(_) => text.push(' '),
            _ => {}
        }
    }

    collapse_whitespace(&text)
}

/// Degraded fallback when a body cannot be processed: the raw markdown with
/// whitespace collapsed. Non-empty beats well-formed for search recall.
pub fn fallback_search_text(markdown: &str) -> String {
    collapse_whitespace(markdown)
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Streaming tag stripper for raw HTML fragments.
///
/// State survives across events because one `<script>` or `<pre>` element
/// regularly spans several consecutive HTML events.
struct RawHtmlText {
    skip_until: Option<&'static str>,
    in_tag: bool,
}

impl RawHtmlText {
    fn new() -> Self {
        Self {
            skip_until: None,
            in_tag: false,
        }
    }

    fn append_text(&mut self, html: &str, out: &mut String) {
        let mut rest = html;

        loop {
            if let Some(close) = self.skip_until {
                match find_ascii_ci(rest, close) {
                    Some(pos) => {
                        rest = &rest[pos + close.len()..];
                        self.skip_until = None;
                    }
                    None => return,
                }
            }

            if self.in_tag {
                match rest.find('>') {
                    Some(pos) => {
                        rest = &rest[pos + 1..];
                        self.in_tag = false;
                    }
                    None => return,
                }
            }

            match rest.find('<') {
                Some(pos) => {
                    push_decoded(out, &rest[..pos]);
                    let tag = &rest[pos..];

                    if opens_element(tag, "script") {
                        self.skip_until = Some("</script>");
                        rest = tag;
                        continue;
                    }
                    if opens_element(tag, "pre") {
                        self.skip_until = Some("</pre>");
                        rest = tag;
                        continue;
                    }

                    match tag.find('>') {
                        Some(end) => rest = &tag[end + 1..],
                        None => {
                            self.in_tag = true;
                            return;
                        }
                    }
                }
                None => {
                    push_decoded(out, rest);
                    return;
                }
            }
        }
    }
}

/// Does this fragment start an opening tag for `name` (`<pre>`, `<PRE id=x>`,
/// but not `</pre>` or `<pres>`)?
fn opens_element(fragment: &str, name: &str) -> bool {
    let bytes = fragment.as_bytes();
    if bytes.len() <= name.len() || bytes[0] != b'<' {
        return false;
    }
    if !bytes[1..=name.len()].eq_ignore_ascii_case(name.as_bytes()) {
        return false;
    }
    matches!(
        bytes.get(name.len() + 1).copied(),
        Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r') | None
    )
}

fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    (0..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

fn push_decoded(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    let decoded = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");
    out.push_str(&decoded);
    out.push(' ');
}
