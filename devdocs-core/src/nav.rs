//! Navigation tree helpers for the page shell.

use crate::config::NavItem;
use crate::slug::{split_anchor, INDEX_SLUG};

/// A flattened navigation entry pointing at one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPage {
    pub title: String,
    /// Canonical slug (`index`, `guides/setup`).
    pub path: String,
}

/// Flatten the navigation tree into its reading order.
///
/// Only internal whole-page links participate: external URLs and
/// `#section` entries are navigation chrome, not stops in the
/// previous/next sequence.
pub fn flatten_navigation(items: &[NavItem]) -> Vec<NavPage> {
    let mut pages = Vec::new();
    collect_pages(items, &mut pages);
    pages
}

fn collect_pages(items: &[NavItem], pages: &mut Vec<NavPage>) {
    for item in items {
        if let Some(path) = item.path.as_deref() {
            if !is_external(path) && !path.contains('#') {
                pages.push(NavPage {
                    title: item.title.clone(),
                    path: path.to_string(),
                });
            }
        }
        collect_pages(&item.children, pages);
    }
}

/// Previous and next pages around `current_slug` in nav order.
///
/// A slug carrying an anchor falls back to its base page's position.
pub fn prev_next(items: &[NavItem], current_slug: &str) -> (Option<NavPage>, Option<NavPage>) {
    let pages = flatten_navigation(items);

    let index = pages
        .iter()
        .position(|page| page.path == current_slug)
        .or_else(|| {
            let (base, _) = split_anchor(current_slug);
            pages.iter().position(|page| page.path == base)
        });

    let Some(index) = index else {
        return (None, None);
    };

    let prev = index.checked_sub(1).map(|i| pages[i].clone());
    let next = pages.get(index + 1).cloned();
    (prev, next)
}

/// Href for a nav path: `index` maps to the site root, anchors ride along,
/// external URLs pass through, and a missing path becomes a dead link.
pub fn nav_href(path: Option<&str>) -> String {
    let Some(path) = path else {
        return String::from("#");
    };
    if is_external(path) {
        return path.to_string();
    }

    let (slug, anchor) = split_anchor(path);
    let base = if slug.is_empty() || slug == INDEX_SLUG {
        String::from("/")
    } else {
        format!("/{}", slug)
    };

    match anchor {
        Some(fragment) => format!("{}#{}", base, fragment),
        None => base,
    }
}

pub fn is_external(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}
