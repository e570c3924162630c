//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"site_name: "My Documentation"
site_description: "Documentation built with devdocs"
site_author: ""
site_url: ""

# repo_url: "https://github.com/org/repo"
# edit_uri: "https://github.com/org/repo/edit/main/content"

paths:
  content: content
  output: site

nav:
  - title: Home
    path: index
  - title: Guides
    children:
      - title: Getting Started
        path: guides/getting-started

theme:
  default: system
  options: [light, dark]

search:
  enabled: true

server:
  port: 8000
"#;

const INDEX_TEMPLATE: &str = r#"---
title: Home
---

# Welcome

This site was generated by devdocs. Edit `content/index.md` to change this
page, and add Markdown files under `content/` to grow the site.
"#;

const GUIDE_TEMPLATE: &str = r#"---
title: Getting Started
---

## Install

```sh
cargo install devdocs-cli
```

## Build the site

```sh
devdocs build
```
"#;

/// Scaffold a new project: config file plus a starter content tree.
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let target = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(target)
        .with_context(|| format!("Failed to create project directory {:?}", target))?;

    let config_path = target.join("devdocs.yml");
    if config_path.exists() {
        bail!("{:?} already exists; refusing to overwrite it", config_path);
    }

    fs::write(&config_path, CONFIG_TEMPLATE).context("Failed to write devdocs.yml")?;

    let content_dir = target.join("content");
    fs::create_dir_all(content_dir.join("guides")).context("Failed to create content tree")?;

    write_if_missing(&content_dir.join("index.md"), INDEX_TEMPLATE)?;
    write_if_missing(
        &content_dir.join("guides/getting-started.md"),
        GUIDE_TEMPLATE,
    )?;

    tracing::info!("Initialized devdocs project in {:?}", target);
    println!("Created devdocs.yml and starter content. Run `devdocs build` to build the site.");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::debug!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
}
