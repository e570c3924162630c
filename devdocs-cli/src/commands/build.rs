//! Build command implementation.

use super::page::{render_not_found, render_page};
use anyhow::{Context, Result};
use devdocs_core::{Site, SiteConfig};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Build the static site: one HTML page per resolvable route, the search
/// index, and the 404 page.
pub fn build_site(config_path: &Path) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = SiteConfig::from_file(config_path).context("Failed to load configuration")?;
    let site = Site::new(config.clone());

    tracing::info!("Building site: {}", config.site_name);

    let output_dir = config.output_dir();
    fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

    let slugs = site.list_all_slugs();
    tracing::info!("Found {} route(s)", slugs.len());

    // Page renders only touch their own source file, so they fan out.
    let results: Vec<Result<()>> = slugs
        .par_iter()
        .map(|slug| write_page(&site, &config, &output_dir, slug))
        .collect();

    let mut written = 0usize;
    for (slug, result) in slugs.iter().zip(results) {
        match result {
            Ok(()) => written += 1,
            Err(err) => tracing::error!("Failed to write page for '{}': {:#}", slug, err),
        }
    }

    if config.search.enabled {
        write_search_index(&site, &output_dir)?;
    } else {
        tracing::info!("Search disabled; skipping search-index.json");
    }

    let not_found = render_not_found(&config, "")?;
    fs::write(output_dir.join("404.html"), not_found).context("Failed to write 404.html")?;

    tracing::info!("✓ Built {} page(s)", written);
    tracing::info!("✓ Output written to {:?}", output_dir);

    Ok(())
}

fn write_page(site: &Site, config: &SiteConfig, output_dir: &Path, slug: &str) -> Result<()> {
    let doc = site
        .resolve(slug)
        .with_context(|| format!("Failed to resolve '{}'", slug))?;
    let html = render_page(config, &doc)?;

    let output_path = page_output_path(output_dir, slug);
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_path, html).with_context(|| format!("Failed to write {:?}", output_path))?;

    tracing::debug!("Rendered: {}", slug);
    Ok(())
}

/// Pretty-URL layout: the root becomes `index.html`, everything else
/// `{slug}/index.html`.
fn page_output_path(output_dir: &Path, slug: &str) -> PathBuf {
    if slug == "index" {
        output_dir.join("index.html")
    } else {
        output_dir.join(slug).join("index.html")
    }
}

fn write_search_index(site: &Site, output_dir: &Path) -> Result<()> {
    let corpus = site.build_search_corpus();
    let json = serde_json::to_string_pretty(&corpus).context("Failed to serialize search index")?;
    fs::write(output_dir.join("search-index.json"), json)
        .context("Failed to write search-index.json")?;

    tracing::info!("Generated search-index.json with {} entries", corpus.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_follow_pretty_url_layout() {
        let out = Path::new("site");
        assert_eq!(page_output_path(out, "index"), Path::new("site/index.html"));
        assert_eq!(
            page_output_path(out, "guides/setup"),
            Path::new("site/guides/setup/index.html")
        );
    }
}
