//! Frontmatter extraction from raw file content.

use crate::models::{Frontmatter, MetaValue};
use regex::Regex;
use std::sync::OnceLock;

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX
        .get_or_init(|| Regex::new(r"(?s)^---\s*\n(.*?)\n---\s*(?:\n(.*))?$").unwrap())
}

/// Split raw file content into a metadata record and the markdown body.
///
/// The content may start with a UTF-8 byte-order mark, which is stripped
/// before parsing. A malformed or unterminated metadata block never aborts
/// resolution: the parser logs a warning and falls back to an empty record
/// with the entire file as the body.
pub fn parse_frontmatter(content: &str) -> (Frontmatter, String) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(captures) = frontmatter_regex().captures(content) else {
        return (Frontmatter::new(), content.to_string());
    };

    let yaml = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let body = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

    match serde_yaml::from_str::<serde_yaml::Value>(yaml) {
        Ok(value) => (frontmatter_from_yaml(value), body.to_string()),
        Err(err) => {
            tracing::warn!("Malformed frontmatter block ({}); treating file as plain markdown", err);
            (Frontmatter::new(), content.to_string())
        }
    }
}

/// Lossily convert a parsed YAML document into the open metadata record.
///
/// Only strings, booleans, and nested maps survive; other scalars are
/// carried as strings and everything else (sequences, nulls) is dropped.
fn frontmatter_from_yaml(value: serde_yaml::Value) -> Frontmatter {
    let mut record = Frontmatter::new();

    let serde_yaml::Value::Mapping(mapping) = value else {
        if !matches!(value, serde_yaml::Value::Null) {
            tracing::warn!("Frontmatter is not a key/value mapping; ignoring it");
        }
        return record;
    };

    for (key, value) in mapping {
        let Some(key) = yaml_key(&key) else {
            tracing::debug!("Skipping non-string frontmatter key {:?}", key);
            continue;
        };
        match meta_value_from_yaml(value) {
            Some(converted) => record.insert(key, converted),
            None => tracing::debug!("Dropping unsupported frontmatter value for '{}'", key),
        }
    }

    record
}

fn yaml_key(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn meta_value_from_yaml(value: serde_yaml::Value) -> Option<MetaValue> {
    match value {
        serde_yaml::Value::String(s) => Some(MetaValue::Str(s)),
        serde_yaml::Value::Bool(b) => Some(MetaValue::Bool(b)),
        serde_yaml::Value::Number(n) => Some(MetaValue::Str(n.to_string())),
        serde_yaml::Value::Mapping(mapping) => {
            let mut nested = std::collections::BTreeMap::new();
            for (key, value) in mapping {
                let Some(key) = yaml_key(&key) else { continue };
                if let Some(converted) = meta_value_from_yaml(value) {
                    nested.insert(key, converted);
                }
            }
            Some(MetaValue::Map(nested))
        }
        serde_yaml::Value::Tagged(tagged) => meta_value_from_yaml(tagged.value),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Null => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_metadata_and_body() {
        let content = "---\ntitle: Setup Guide\ndraft: true\n---\n\n# Setup\n\nBody text.";
        let (fm, body) = parse_frontmatter(content);

        assert_eq!(fm.get_str("title"), Some("Setup Guide"));
        assert_eq!(fm.get_bool("draft"), Some(true));
        assert!(body.contains("# Setup"));
        assert!(!body.contains("---"));
    }

    #[test]
    fn missing_block_returns_whole_content() {
        let content = "# Just Content\n\nNo metadata here.";
        let (fm, body) = parse_frontmatter(content);

        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn bom_is_stripped_before_parsing() {
        let content = "\u{feff}---\ntitle: Home\n---\nWelcome.";
        let (fm, body) = parse_frontmatter(content);

        assert_eq!(fm.get_str("title"), Some("Home"));
        assert_eq!(body, "Welcome.");
    }

    #[test]
    fn malformed_yaml_falls_back_to_full_body() {
        let content = "---\ntitle: Test\nbroken yaml: [unclosed\n---\n\nContent.";
        let (fm, body) = parse_frontmatter(content);

        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn unterminated_block_is_treated_as_body() {
        let content = "---\ntitle: Never closed\n\nStill the body.";
        let (fm, body) = parse_frontmatter(content);

        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn scalars_coerce_and_sequences_drop() {
        let content = "---\ntitle: Versioned\nversion: 2\ntags:\n  - a\n  - b\nmeta:\n  owner: docs-team\n---\nBody.";
        let (fm, _body) = parse_frontmatter(content);

        assert_eq!(fm.get_str("version"), Some("2"));
        assert_eq!(fm.get("tags"), None);
        let meta = fm.get("meta").and_then(|v| v.as_map()).unwrap();
        assert_eq!(meta["owner"].as_str(), Some("docs-team"));
    }

    #[test]
    fn empty_body_after_block_is_allowed() {
        let content = "---\ntitle: Stub\n---\n";
        let (fm, body) = parse_frontmatter(content);

        assert_eq!(fm.get_str("title"), Some("Stub"));
        assert_eq!(body, "");
    }
}
