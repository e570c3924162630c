//! Askama template definitions.

use askama::Template;
use devdocs_core::config::NavItem;
use devdocs_core::nav::{is_external, nav_href};

/// A previous/next footer link.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub title: String,
    pub href: String,
}

/// Full document page.
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    // Page metadata
    pub title: String,
    pub description: String,

    // Rendered document fragment
    pub content: String,

    // Site metadata
    pub site_name: String,
    pub copyright: String,
    pub logo_path: String,
    pub favicon_path: String,

    // Navigation
    pub nav_html: String,
    pub prev: Option<PageLink>,
    pub next: Option<PageLink>,

    // "Edit this page" target, when the site configures an edit URI
    pub edit_url: Option<String>,

    // Client-side search wiring
    pub search_enabled: bool,
}

/// Page shown for unresolvable routes.
#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub site_name: String,
    pub copyright: String,
    pub nav_html: String,
    pub requested_path: String,
}

/// Render the navigation tree to nested list markup.
///
/// Built in Rust rather than in the template because the tree recurses to
/// arbitrary depth. The entry matching `current_slug` is marked active.
pub fn render_nav(items: &[NavItem], current_slug: &str) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut html = String::from("<ul class=\"nav-list\">\n");
    for item in items {
        render_nav_item(&mut html, item, current_slug);
    }
    html.push_str("</ul>\n");
    html
}

fn render_nav_item(html: &mut String, item: &NavItem, current_slug: &str) {
    html.push_str("  <li class=\"nav-item\">\n");

    match item.path.as_deref() {
        Some(path) => {
            let active = path == current_slug;
            let external = is_external(path);
            html.push_str(&format!(
                "    <a href=\"{}\"{}{}>{}</a>\n",
                html_escape(&nav_href(Some(path))),
                if active { " class=\"active\"" } else { "" },
                if external { " rel=\"external\"" } else { "" },
                html_escape(&item.title)
            ));
        }
        None => {
            html.push_str(&format!(
                "    <span class=\"nav-section\">{}</span>\n",
                html_escape(&item.title)
            ));
        }
    }

    if !item.children.is_empty() {
        html.push_str(&render_nav(&item.children, current_slug));
    }

    html.push_str("  </li>\n");
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav_fixture() -> Vec<NavItem> {
        vec![
            NavItem {
                title: "Home".into(),
                path: Some("index".into()),
                children: vec![],
            },
            NavItem {
                title: "Guides".into(),
                path: None,
                children: vec![NavItem {
                    title: "Setup & Teardown".into(),
                    path: Some("guides/setup".into()),
                    children: vec![],
                }],
            },
        ]
    }

    #[test]
    fn nav_marks_the_active_page() {
        let html = render_nav(&nav_fixture(), "guides/setup");
        assert!(html.contains("<a href=\"/guides/setup\" class=\"active\">"));
        assert!(html.contains("<a href=\"/\">Home</a>"));
        assert!(html.contains("Setup &amp; Teardown"));
        assert!(html.contains("<span class=\"nav-section\">Guides</span>"));
    }

    #[test]
    fn page_template_renders_content_unescaped() {
        let template = PageTemplate {
            title: "Setup".into(),
            description: "How to set up".into(),
            content: "<h2 id=\"install\">Install</h2>".into(),
            site_name: "DevDocs".into(),
            copyright: "© 2026 DevDocs".into(),
            logo_path: String::new(),
            favicon_path: String::new(),
            nav_html: render_nav(&nav_fixture(), "guides/setup"),
            prev: Some(PageLink {
                title: "Home".into(),
                href: "/".into(),
            }),
            next: None,
            edit_url: Some("https://example.com/edit/guides/setup.md".into()),
            search_enabled: true,
        };

        let html = template.render().unwrap();
        assert!(html.contains("<h2 id=\"install\">Install</h2>"));
        assert!(html.contains("<title>Setup · DevDocs</title>"));
        assert!(html.contains("https://example.com/edit/guides/setup.md"));
        assert!(html.contains("search-index.json"));
        assert!(html.contains("rel=\"prev\""));
        assert!(!html.contains("rel=\"next\""));
    }

    #[test]
    fn not_found_template_names_the_missing_route() {
        let template = NotFoundTemplate {
            site_name: "DevDocs".into(),
            copyright: "© 2026 DevDocs".into(),
            nav_html: String::new(),
            requested_path: "guides/missing".into(),
        };

        let html = template.render().unwrap();
        assert!(html.contains("guides/missing"));
        assert!(html.contains("Page not found"));
    }
}
