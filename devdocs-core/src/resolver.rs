//! Slug-to-file resolution.

use crate::slug::INDEX_SLUG;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    /// No content file matches the slug. The routing layer maps this to its
    /// "page absent" response; enumeration just skips the slug. Read and
    /// metadata failures degrade to this too -- resolution either fully
    /// succeeds or cleanly signals absence.
    #[error("no content file matches '{0}'")]
    NotFound(String),
}

/// Probe the fixed candidate locations for a canonical slug and return the
/// first existing regular file.
///
/// Priority order: direct file (`{slug}.md`, `{slug}.mdx`), then the
/// directory landing page (`{slug}/index.md`, `{slug}/index.mdx`). The root
/// slug probes the root index files only.
pub fn locate_file(content_root: &Path, slug: &str) -> Option<PathBuf> {
    if slug.split('/').any(|segment| segment == "..") {
        tracing::warn!("Rejecting slug '{}': parent traversal is not allowed", slug);
        return None;
    }

    let candidates: Vec<PathBuf> = if slug == INDEX_SLUG {
        vec![
            content_root.join("index.md"),
            content_root.join("index.mdx"),
        ]
    } else {
        vec![
            content_root.join(format!("{}.md", slug)),
            content_root.join(format!("{}.mdx", slug)),
            content_root.join(slug).join("index.md"),
            content_root.join(slug).join("index.mdx"),
        ]
    };

    for candidate in candidates {
        match fs::metadata(&candidate) {
            Ok(meta) if meta.is_file() => return Some(candidate),
            Ok(_) => {
                // A directory with this name is not a match; its landing
                // page is a later candidate.
                tracing::debug!("Candidate {} is not a regular file", candidate.display());
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(
                    "Cannot access candidate {}: {}",
                    candidate.display(),
                    err
                );
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn direct_file_beats_directory_index() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("guides.md"), "direct").unwrap();
        fs::create_dir(root.path().join("guides")).unwrap();
        fs::write(root.path().join("guides/index.md"), "landing").unwrap();

        let found = locate_file(root.path(), "guides").unwrap();
        assert_eq!(found, root.path().join("guides.md"));
    }

    #[test]
    fn md_beats_mdx() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("about.md"), "md").unwrap();
        fs::write(root.path().join("about.mdx"), "mdx").unwrap();

        let found = locate_file(root.path(), "about").unwrap();
        assert_eq!(found, root.path().join("about.md"));
    }

    #[test]
    fn directory_index_is_found() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("guides")).unwrap();
        fs::write(root.path().join("guides/index.mdx"), "landing").unwrap();

        let found = locate_file(root.path(), "guides").unwrap();
        assert_eq!(found, root.path().join("guides/index.mdx"));
    }

    #[test]
    fn root_slug_probes_root_index_only() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("index.md"), "home").unwrap();

        let found = locate_file(root.path(), "index").unwrap();
        assert_eq!(found, root.path().join("index.md"));
    }

    #[test]
    fn missing_file_is_none() {
        let root = tempdir().unwrap();
        assert!(locate_file(root.path(), "nope").is_none());
    }

    #[test]
    fn bare_directory_without_index_is_none() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("guides")).unwrap();
        assert!(locate_file(root.path(), "guides").is_none());
    }

    #[test]
    fn parent_traversal_is_rejected() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("docs")).unwrap();
        fs::write(root.path().join("secret.md"), "outside").unwrap();

        assert!(locate_file(&root.path().join("docs"), "../secret").is_none());
    }
}
