//! Content tree traversal producing the slug universe.

use crate::slug::{normalize_slug, INDEX_SLUG};
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// File extensions that count as content.
pub(crate) const CONTENT_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Walk the content tree and return the slug of every content file, in
/// deterministic traversal order with duplicates removed (a directory's
/// `index.md` and a sibling `{dir}.md` fold to the same slug).
///
/// Unreadable directories are logged and skipped; the rest of the tree
/// still gets walked.
pub fn discover_slugs(content_root: &Path) -> Vec<String> {
    let mut slugs = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for entry in WalkDir::new(content_root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Skipping unreadable entry during walk: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !CONTENT_EXTENSIONS.contains(&ext) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(content_root)
            .unwrap_or_else(|_| entry.path());
        let slug = normalize_slug(&relative.to_string_lossy());

        if seen.insert(slug.clone()) {
            slugs.push(slug);
        }
    }

    // `index` belongs to the universe exactly when a root index file
    // exists; a nested `index/index.md` must not smuggle it in.
    let has_root_index = content_root.join("index.md").is_file()
        || content_root.join("index.mdx").is_file();
    if has_root_index {
        if seen.insert(INDEX_SLUG.to_string()) {
            slugs.insert(0, INDEX_SLUG.to_string());
        }
    } else if seen.contains(INDEX_SLUG) {
        tracing::warn!("No root index file; dropping '{}' from the route set", INDEX_SLUG);
        slugs.retain(|slug| slug != INDEX_SLUG);
    }

    slugs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# page\n").unwrap();
    }

    #[test]
    fn discovers_and_normalizes_content_files() {
        let root = tempdir().unwrap();
        touch(root.path(), "index.md");
        touch(root.path(), "about.md");
        touch(root.path(), "guides/setup.mdx");
        touch(root.path(), "guides/index.md");
        touch(root.path(), "notes.txt");

        let slugs = discover_slugs(root.path());
        let expected: HashSet<&str> = ["index", "about", "guides", "guides/setup"]
            .into_iter()
            .collect();
        let found: HashSet<&str> = slugs.iter().map(String::as_str).collect();

        assert_eq!(found, expected);
    }

    #[test]
    fn order_is_deterministic() {
        let root = tempdir().unwrap();
        touch(root.path(), "index.md");
        touch(root.path(), "b.md");
        touch(root.path(), "a.md");

        assert_eq!(discover_slugs(root.path()), discover_slugs(root.path()));
    }

    #[test]
    fn duplicate_slugs_collapse() {
        let root = tempdir().unwrap();
        touch(root.path(), "index.md");
        touch(root.path(), "guides.md");
        touch(root.path(), "guides/index.md");

        let slugs = discover_slugs(root.path());
        assert_eq!(slugs.iter().filter(|s| *s == "guides").count(), 1);
    }

    #[test]
    fn index_requires_a_root_index_file() {
        let root = tempdir().unwrap();
        touch(root.path(), "about.md");
        // Folds to the slug `index` but is not resolvable as the root.
        touch(root.path(), "index/index.md");

        let slugs = discover_slugs(root.path());
        assert!(!slugs.contains(&"index".to_string()));

        touch(root.path(), "index.md");
        let slugs = discover_slugs(root.path());
        assert!(slugs.contains(&"index".to_string()));
    }

    #[test]
    fn empty_tree_yields_no_slugs() {
        let root = tempdir().unwrap();
        assert!(discover_slugs(root.path()).is_empty());
    }
}
