//! Content model structs for resolved documents and the search corpus.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A frontmatter value.
///
/// Frontmatter is an open record with no fixed schema; consumers probe the
/// fields they care about. Scalars that are neither strings nor booleans
/// (numbers, dates) are carried as their string form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Str(String),
    Map(BTreeMap<String, MetaValue>),
}

impl MetaValue {
    /// The string form of this value, if it has one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, MetaValue>> {
        match self {
            MetaValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Metadata record extracted from the head of a content file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter {
    fields: BTreeMap<String, MetaValue>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.fields.get(key)
    }

    /// Fetch a string field, treating blank values as absent.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(MetaValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(MetaValue::as_bool)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetaValue)> {
        self.fields.iter()
    }
}

/// A fully resolved document, constructed fresh per resolution request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Canonical slug this document was resolved for.
    pub slug: String,

    /// Display title (frontmatter title, humanized path, or site fallback).
    pub title: String,

    /// Rendered HTML fragment, safe to inject into a page shell.
    pub content_html: String,

    /// Markdown body without the frontmatter block.
    pub raw_body: String,

    /// Frontmatter record, always carrying `source_file_path` (the file's
    /// path relative to the content root) for edit links downstream.
    pub frontmatter: Frontmatter,
}

impl Document {
    /// The file path relative to the content root this document came from.
    pub fn source_file_path(&self) -> Option<&str> {
        self.frontmatter.get_str("source_file_path")
    }

    /// Description for page metadata, if the author provided one.
    pub fn description(&self) -> Option<&str> {
        self.frontmatter.get_str("description")
    }
}

/// One document's contribution to the full-text search corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEntry {
    pub slug: String,
    pub title: String,
    /// Plain indexable text: no markup, no code, no script payloads.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_str_ignores_blank_values() {
        let mut fm = Frontmatter::new();
        fm.insert("title", MetaValue::Str("  ".into()));
        fm.insert("description", MetaValue::Str("A guide".into()));

        assert_eq!(fm.get_str("title"), None);
        assert_eq!(fm.get_str("description"), Some("A guide"));
        assert_eq!(fm.get_str("missing"), None);
    }

    #[test]
    fn typed_accessors_reject_other_shapes() {
        let mut fm = Frontmatter::new();
        fm.insert("draft", MetaValue::Bool(true));
        fm.insert(
            "extra",
            MetaValue::Map(BTreeMap::from([(
                "nested".to_string(),
                MetaValue::Str("x".into()),
            )])),
        );

        assert_eq!(fm.get_bool("draft"), Some(true));
        assert_eq!(fm.get_str("draft"), None);
        let nested = fm.get("extra").and_then(MetaValue::as_map).unwrap();
        assert_eq!(nested["nested"].as_str(), Some("x"));
    }
}
