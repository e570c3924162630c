//! Document resolution over one configured content root.
//!
//! `Site` owns no caches and reads no global state: it is constructed from
//! an explicit configuration and every call re-reads the filesystem, which
//! keeps resolution deterministic and leaves caching policy to callers.

use crate::config::SiteConfig;
use crate::frontmatter::parse_frontmatter;
use crate::markdown::search_text::{extract_search_text, fallback_search_text};
use crate::markdown::MarkdownRenderer;
use crate::models::{Document, Frontmatter, MetaValue, SearchEntry};
use crate::resolver::{locate_file, ResolveError};
use crate::slug::{humanize, normalize_slug, split_anchor, INDEX_SLUG};
use crate::walker::discover_slugs;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;

pub struct Site {
    config: SiteConfig,
    content_root: PathBuf,
    renderer: MarkdownRenderer,
}

impl Site {
    pub fn new(config: SiteConfig) -> Self {
        let content_root = config.content_dir();
        Self {
            config,
            content_root,
            renderer: MarkdownRenderer::new(),
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Resolve a request path to a document.
    ///
    /// The path may be raw (extension, stray slashes, `#fragment`); it is
    /// normalized first and any anchor is ignored for resolution. Returns
    /// `NotFound` when no file matches or the matching file cannot be read.
    pub fn resolve(&self, request: &str) -> Result<Document, ResolveError> {
        let (path, _anchor) = split_anchor(request);
        let slug = normalize_slug(path);

        let file = locate_file(&self.content_root, &slug)
            .ok_or_else(|| ResolveError::NotFound(slug.clone()))?;

        let raw = match fs::read_to_string(&file) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("Failed to read {}: {}", file.display(), err);
                return Err(ResolveError::NotFound(slug));
            }
        };

        let (mut frontmatter, body) = parse_frontmatter(&raw);
        let content_html = self.renderer.render_or_fallback(&body, &file);
        let title = self.derive_title(&slug, &frontmatter);

        let source_file_path = file
            .strip_prefix(&self.content_root)
            .unwrap_or(&file)
            .to_string_lossy()
            .replace('\\', "/");
        frontmatter.insert("source_file_path", MetaValue::Str(source_file_path));

        Ok(Document {
            slug,
            title,
            content_html,
            raw_body: body,
            frontmatter,
        })
    }

    /// Resolve from pre-split path segments (router captures).
    pub fn resolve_segments<S: AsRef<str>>(&self, segments: &[S]) -> Result<Document, ResolveError> {
        let joined = segments
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join("/");
        self.resolve(&joined)
    }

    /// Every slug that resolves to a document, in deterministic walk order.
    ///
    /// Discovery and resolvability stay in lockstep: anything the resolver
    /// would report absent is filtered out here rather than becoming a
    /// broken route.
    pub fn list_all_slugs(&self) -> Vec<String> {
        let discovered = discover_slugs(&self.content_root);
        let total = discovered.len();

        let slugs: Vec<String> = discovered
            .into_par_iter()
            .filter(|slug| self.is_resolvable(slug))
            .collect();

        if slugs.len() < total {
            tracing::warn!(
                "{} discovered slug(s) did not resolve and were dropped",
                total - slugs.len()
            );
        }
        slugs
    }

    /// Build the full-text search corpus, one entry per resolvable slug.
    ///
    /// Per-document resolutions are independent, so they fan out in
    /// parallel; entry order still follows the walk. Slugs that fail to
    /// resolve are excluded and counted, never fatal.
    pub fn build_search_corpus(&self) -> Vec<SearchEntry> {
        let slugs = self.list_all_slugs();
        let total = slugs.len();

        let entries: Vec<SearchEntry> = slugs
            .par_iter()
            .filter_map(|slug| match self.resolve(slug) {
                Ok(doc) => Some(search_entry(doc)),
                Err(err) => {
                    tracing::warn!("Excluding '{}' from search corpus: {}", slug, err);
                    None
                }
            })
            .collect();

        tracing::info!(
            "Search corpus: {} entries ({} excluded)",
            entries.len(),
            total - entries.len()
        );
        entries
    }

    /// Title precedence: frontmatter, humanized slug tail, site fallback.
    fn derive_title(&self, slug: &str, frontmatter: &Frontmatter) -> String {
        if let Some(title) = frontmatter.get_str("title") {
            return title.to_string();
        }

        if slug == INDEX_SLUG {
            return if self.config.site_name.is_empty() {
                "Home".to_string()
            } else {
                self.config.site_name.clone()
            };
        }

        // The slug's last segment is the file stem, or the parent directory
        // name when the file was a folded index page.
        for segment in slug.rsplit('/') {
            let humanized = humanize(segment);
            if !humanized.is_empty() {
                return humanized;
            }
        }

        "Untitled".to_string()
    }

    /// Rendering degrades instead of failing, so resolvability reduces to
    /// locating the file and being able to read it.
    fn is_resolvable(&self, slug: &str) -> bool {
        match locate_file(&self.content_root, slug) {
            Some(file) => fs::read_to_string(&file).is_ok(),
            None => false,
        }
    }
}

fn search_entry(doc: Document) -> SearchEntry {
    let mut content = extract_search_text(&doc.raw_body);
    if content.is_empty() && !doc.raw_body.trim().is_empty() {
        tracing::warn!(
            "Search text for '{}' came out empty; indexing the raw body",
            doc.slug
        );
        content = fallback_search_text(&doc.raw_body);
    }

    SearchEntry {
        slug: doc.slug,
        title: doc.title,
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site_with(files: &[(&str, &str)]) -> (TempDir, Site) {
        let dir = tempdir().unwrap();
        for (rel, content) in files {
            write(dir.path(), rel, content);
        }
        let config = SiteConfig::for_content_root(dir.path());
        (dir, Site::new(config))
    }

    #[test]
    fn resolves_a_direct_file() {
        let (_dir, site) = site_with(&[("about.md", "---\ntitle: About Us\n---\nHello.")]);

        let doc = site.resolve("about").unwrap();
        assert_eq!(doc.slug, "about");
        assert_eq!(doc.title, "About Us");
        assert!(doc.content_html.contains("Hello."));
        assert_eq!(doc.source_file_path(), Some("about.md"));
    }

    #[test]
    fn resolves_directory_landing_pages() {
        let (_dir, site) = site_with(&[("guides/index.md", "# Guides\n")]);

        let doc = site.resolve("guides").unwrap();
        assert_eq!(doc.slug, "guides");
        assert_eq!(doc.source_file_path(), Some("guides/index.md"));

        // The raw `guides/index` route folds to the same document.
        let folded = site.resolve("guides/index").unwrap();
        assert_eq!(folded.slug, "guides");
    }

    #[test]
    fn missing_page_is_not_found() {
        let (_dir, site) = site_with(&[("index.md", "home")]);
        let err = site.resolve("nope").unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(slug) if slug == "nope"));
    }

    #[test]
    fn anchors_do_not_affect_resolution() {
        let (_dir, site) = site_with(&[("guides/setup.md", "## Install\n")]);

        let doc = site.resolve("guides/setup#install").unwrap();
        assert_eq!(doc.slug, "guides/setup");
        assert!(doc.content_html.contains("id=\"install\""));
    }

    #[test]
    fn title_falls_back_to_humanized_filename() {
        let (_dir, site) = site_with(&[("guides/getting-started.md", "content\n")]);
        let doc = site.resolve("guides/getting-started").unwrap();
        assert_eq!(doc.title, "Getting Started");
    }

    #[test]
    fn folded_index_titles_use_the_directory_name() {
        let (_dir, site) = site_with(&[("user-guide/index.md", "content\n")]);
        let doc = site.resolve("user-guide").unwrap();
        assert_eq!(doc.title, "User Guide");
    }

    #[test]
    fn root_title_falls_back_to_site_name() {
        let (_dir, site) = site_with(&[("index.md", "welcome\n")]);
        let doc = site.resolve("index").unwrap();
        assert_eq!(doc.title, site.config().site_name);
    }

    #[test]
    fn malformed_frontmatter_still_resolves() {
        let (_dir, site) = site_with(&[(
            "broken.md",
            "---\ntitle: Broken\nbad yaml: [unclosed\n---\nStill readable.",
        )]);

        let doc = site.resolve("broken").unwrap();
        assert!(!doc.raw_body.is_empty());
        assert!(doc.content_html.contains("Still readable."));
        // The fallback record still carries the source path.
        assert_eq!(doc.source_file_path(), Some("broken.md"));
        assert_eq!(doc.title, "Broken"); // humanized filename, not the bad block
    }

    #[test]
    fn listed_slugs_all_resolve() {
        let (_dir, site) = site_with(&[
            ("index.md", "home"),
            ("about.md", "about"),
            ("guides/index.md", "guides"),
            ("guides/setup.md", "setup"),
        ]);

        let slugs = site.list_all_slugs();
        let expected: HashSet<&str> = ["index", "about", "guides", "guides/setup"]
            .into_iter()
            .collect();
        assert_eq!(
            slugs.iter().map(String::as_str).collect::<HashSet<_>>(),
            expected
        );

        for slug in &slugs {
            assert!(site.resolve(slug).is_ok(), "listed slug '{}' must resolve", slug);
        }
    }

    #[test]
    fn corpus_diverges_from_rendered_html_on_code() {
        let (_dir, site) = site_with(&[
            ("index.md", "# Home\n"),
            (
                "guides/setup.md",
                "## Install\n\n```js\nconsole.log(\"SECRET_TOKEN\");\n```\n",
            ),
        ]);

        let doc = site.resolve("guides/setup").unwrap();
        assert!(doc.content_html.contains("SECRET_TOKEN"));

        let corpus = site.build_search_corpus();
        let entry = corpus.iter().find(|e| e.slug == "guides/setup").unwrap();
        assert!(!entry.content.contains("SECRET_TOKEN"));
        assert!(!entry.content.contains("console.log"));
        assert!(entry.content.contains("Install"));
    }

    #[test]
    fn corpus_covers_every_listed_slug() {
        let (_dir, site) = site_with(&[
            ("index.md", "home page text"),
            ("a.md", "alpha"),
            ("b.md", "beta"),
        ]);

        let slugs: HashSet<String> = site.list_all_slugs().into_iter().collect();
        let corpus = site.build_search_corpus();

        assert_eq!(corpus.len(), slugs.len());
        for entry in &corpus {
            assert!(slugs.contains(&entry.slug));
            assert!(!entry.content.is_empty());
        }
    }

    #[test]
    fn all_code_documents_fall_back_to_raw_body() {
        let (_dir, site) = site_with(&[("snippets.md", "```\nonly code here\n```\n")]);

        let corpus = site.build_search_corpus();
        let entry = corpus.iter().find(|e| e.slug == "snippets").unwrap();
        assert!(!entry.content.is_empty());
    }

    #[test]
    fn scenario_two_file_site() {
        let (_dir, site) = site_with(&[
            ("index.md", "---\ntitle: Home\n---\nWelcome.\n"),
            (
                "guides/setup.md",
                "## Install\n\n```js\nconsole.log(1)\n```\n",
            ),
        ]);

        let slugs: HashSet<String> = site.list_all_slugs().into_iter().collect();
        assert_eq!(
            slugs,
            HashSet::from(["index".to_string(), "guides/setup".to_string()])
        );

        let doc = site.resolve("guides/setup").unwrap();
        assert_eq!(doc.title, "Setup");
        assert!(doc.content_html.contains("id=\"install\""));
        assert!(doc.content_html.contains("language-js"));
        assert!(doc.content_html.contains("<span"));

        let corpus = site.build_search_corpus();
        let entry = corpus.iter().find(|e| e.slug == "guides/setup").unwrap();
        assert!(!entry.content.contains("console.log"));
    }
}
