//! # devdocs-render
//!
//! HTML page-shell rendering for devdocs, using Askama templates. The core
//! produces document fragments; this crate composes them into full pages.

pub mod templates;

pub use templates::{render_nav, NotFoundTemplate, PageLink, PageTemplate};
