//! Routes command implementation.

use anyhow::{Context, Result};
use devdocs_core::{Site, SiteConfig};
use std::path::Path;

/// Print every resolvable route, one per line or as a JSON array.
pub fn list_routes(config_path: &Path, json: bool) -> Result<()> {
    let config = SiteConfig::from_file(config_path).context("Failed to load configuration")?;
    let site = Site::new(config);

    let slugs = site.list_all_slugs();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&slugs).context("Failed to serialize routes")?
        );
    } else {
        for slug in &slugs {
            println!("{}", slug);
        }
        tracing::info!("{} route(s)", slugs.len());
    }

    Ok(())
}
