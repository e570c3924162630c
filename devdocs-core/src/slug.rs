//! Route-slug normalization and heading-id generation.

use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

/// Canonical slug for the site root and for directory landing pages.
pub const INDEX_SLUG: &str = "index";

/// Normalize a raw route path into its canonical slug.
///
/// Rules:
/// - `/` is the only separator; backslashes are rewritten, empty segments
///   are dropped
/// - a trailing `.md`/`.mdx` extension is stripped (callers should not pass
///   extensions, but nav config and defensive callers sometimes do)
/// - a trailing `index` component folds into its parent directory
///   (`guides/index` -> `guides`), except at the root where the slug stays
///   `index`
/// - no leading or trailing slashes; the empty path is the root
///
/// Normalization is idempotent: feeding a canonical slug back in returns it
/// unchanged.
///
/// # Examples
///
/// ```
/// use devdocs_core::normalize_slug;
///
/// assert_eq!(normalize_slug(""), "index");
/// assert_eq!(normalize_slug("/guides/setup.md"), "guides/setup");
/// assert_eq!(normalize_slug("guides/index"), "guides");
/// ```
pub fn normalize_slug(raw: &str) -> String {
    let mut segments: Vec<String> = raw
        .replace('\\', "/")
        .split('/')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();

    if let Some(last) = segments.last_mut() {
        let stripped = last
            .strip_suffix(".mdx")
            .or_else(|| last.strip_suffix(".md"))
            .map(str::to_string);
        if let Some(stripped) = stripped {
            *last = stripped;
        }
        if last.is_empty() {
            segments.pop();
        }
    }

    // Fold a trailing index component into its parent; the bare root index
    // keeps its name.
    if segments.len() > 1 {
        if let Some(last) = segments.last() {
            if last.eq_ignore_ascii_case(INDEX_SLUG) {
                segments.pop();
            }
        }
    }

    let slug = segments.join("/");
    if slug.is_empty() {
        INDEX_SLUG.to_string()
    } else {
        slug
    }
}

/// Normalize a slug from pre-split path segments (e.g. request captures).
pub fn normalize_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let joined = segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join("/");
    normalize_slug(&joined)
}

/// Split an anchor fragment off a route path.
///
/// Anchors never participate in file resolution; the fragment is handed
/// back verbatim so callers can reattach it after normalizing the path
/// portion.
pub fn split_anchor(raw: &str) -> (&str, Option<&str>) {
    match raw.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (raw, None),
    }
}

/// Normalize a route that may carry an anchor fragment, preserving the
/// fragment unchanged (`guides/setup.md#install` -> `guides/setup#install`).
pub fn normalize_route(raw: &str) -> String {
    let (path, anchor) = split_anchor(raw);
    let slug = normalize_slug(path);
    match anchor {
        Some(fragment) => format!("{}#{}", slug, fragment),
        None => slug,
    }
}

static HYPHEN_RUN: OnceLock<Regex> = OnceLock::new();

fn hyphen_run() -> &'static Regex {
    HYPHEN_RUN.get_or_init(|| Regex::new(r"-+").unwrap())
}

/// Convert heading text to a URL-safe id.
///
/// Lowercases, maps whitespace and underscores to hyphens, drops everything
/// that is not alphanumeric (unicode letters survive), collapses hyphen
/// runs, and trims hyphens from both ends.
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();

    let hyphenated: String = lowered
        .graphemes(true)
        .map(|g| match g {
            " " | "_" | "\t" | "\n" => "-",
            _ => g,
        })
        .collect();

    let cleaned: String = hyphenated
        .graphemes(true)
        .filter_map(|g| {
            let c = g.chars().next()?;
            if c.is_ascii_alphanumeric() || c == '-' || c.is_alphabetic() {
                Some(g)
            } else {
                None
            }
        })
        .collect();

    hyphen_run()
        .replace_all(&cleaned, "-")
        .trim_matches('-')
        .to_string()
}

/// Turn a slug segment or file stem into a display title
/// (`getting-started` -> `Getting Started`).
pub fn humanize(segment: &str) -> String {
    segment
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
