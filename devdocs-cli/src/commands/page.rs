//! Shared page-shell composition for the build and serve commands.

use anyhow::{Context, Result};
use askama::Template;
use devdocs_core::nav::{nav_href, prev_next};
use devdocs_core::{Document, SiteConfig};
use devdocs_render::{render_nav, NotFoundTemplate, PageLink, PageTemplate};

/// Compose a resolved document into a full HTML page.
pub fn render_page(config: &SiteConfig, doc: &Document) -> Result<String> {
    let (prev, next) = prev_next(&config.nav, &doc.slug);

    let template = PageTemplate {
        title: doc.title.clone(),
        description: doc
            .description()
            .unwrap_or(&config.site_description)
            .to_string(),
        content: doc.content_html.clone(),
        site_name: config.site_name.clone(),
        copyright: config.copyright_line(),
        logo_path: config.logo_path.clone(),
        favicon_path: config.favicon_path.clone(),
        nav_html: render_nav(&config.nav, &doc.slug),
        prev: prev.map(|page| PageLink {
            href: nav_href(Some(&page.path)),
            title: page.title,
        }),
        next: next.map(|page| PageLink {
            href: nav_href(Some(&page.path)),
            title: page.title,
        }),
        edit_url: edit_url(config, doc),
        search_enabled: config.search.enabled,
    };

    template
        .render()
        .with_context(|| format!("Failed to render page for '{}'", doc.slug))
}

/// Compose the 404 page for a missing route.
pub fn render_not_found(config: &SiteConfig, requested_path: &str) -> Result<String> {
    let template = NotFoundTemplate {
        site_name: config.site_name.clone(),
        copyright: config.copyright_line(),
        nav_html: render_nav(&config.nav, ""),
        requested_path: requested_path.to_string(),
    };

    template.render().context("Failed to render 404 page")
}

/// "Edit this page" target: the configured edit URI joined with the
/// document's source path.
fn edit_url(config: &SiteConfig, doc: &Document) -> Option<String> {
    if config.edit_uri.is_empty() {
        return None;
    }
    let source = doc.source_file_path()?;
    Some(format!(
        "{}/{}",
        config.edit_uri.trim_end_matches('/'),
        source
    ))
}
