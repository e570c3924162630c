//! Site configuration loading and defaults.
//!
//! The configuration is an explicit value handed to the core's entry
//! points; nothing in this crate reads process-global state. Relative
//! paths resolve against the config file's directory so a site builds the
//! same from any working directory.

use crate::slug::normalize_route;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the devdocs.yml schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub site_name: String,

    #[serde(default)]
    pub site_description: String,

    #[serde(default)]
    pub site_author: String,

    #[serde(default)]
    pub site_url: String,

    #[serde(default)]
    pub repo_name: String,

    #[serde(default)]
    pub repo_url: String,

    /// Base URI for "edit this page" links, joined with each document's
    /// source path (e.g. `https://github.com/org/repo/edit/main/docs/`).
    #[serde(default)]
    pub edit_uri: String,

    #[serde(default)]
    pub copyright: Option<String>,

    #[serde(default)]
    pub logo_path: String,

    #[serde(default)]
    pub favicon_path: String,

    #[serde(default)]
    pub nav: Vec<NavItem>,

    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub server: ServerConfig,

    // Path to the config file itself, for relative path resolution.
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_site_name() -> String {
    String::from("DevDocs")
}

/// One entry in the navigation tree. `path` holds a slug (optionally with
/// an anchor) or an external URL; section headers carry only children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavItem {
    pub title: String,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub children: Vec<NavItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_theme_default")]
    pub default: String,

    #[serde(default = "default_theme_options")]
    pub options: Vec<String>,
}

fn default_theme_default() -> String {
    String::from("system")
}

fn default_theme_options() -> Vec<String> {
    vec![String::from("light"), String::from("dark")]
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default: default_theme_default(),
            options: default_theme_options(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_content_path")]
    pub content: PathBuf,

    #[serde(default = "default_output_path")]
    pub output: PathBuf,
}

fn default_content_path() -> PathBuf {
    PathBuf::from("content")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("site")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: default_content_path(),
            output: default_output_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            site_description: String::new(),
            site_author: String::new(),
            site_url: String::new(),
            repo_name: String::new(),
            repo_url: String::new(),
            edit_uri: String::new(),
            copyright: None,
            logo_path: String::new(),
            favicon_path: String::new(),
            nav: Vec::new(),
            theme: ThemeConfig::default(),
            search: SearchConfig::default(),
            paths: PathsConfig::default(),
            server: ServerConfig::default(),
            config_path: None,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: SiteConfig = serde_yaml::from_str(&contents)?;

        config.config_path = Some(path.to_path_buf());
        normalize_nav_paths(&mut config.nav);

        Ok(config)
    }

    /// A default configuration rooted at the given content directory.
    pub fn for_content_root<P: Into<PathBuf>>(root: P) -> Self {
        let mut config = Self::default();
        config.paths.content = root.into();
        config
    }

    /// Content root, resolved relative to the config file.
    pub fn content_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.content)
    }

    /// Output directory for static builds, resolved relative to the config
    /// file.
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Footer copyright line; defaults to the current year and site name.
    pub fn copyright_line(&self) -> String {
        match &self.copyright {
            Some(line) => line.clone(),
            None => format!("© {} {}", chrono::Utc::now().year(), self.site_name),
        }
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.config_path.as_ref().and_then(|p| p.parent()) {
            Some(parent) => parent.join(path),
            None => path.to_path_buf(),
        }
    }
}

/// Rewrite internal nav paths to canonical slugs (anchors preserved),
/// leaving external URLs alone. Runs once at load so every downstream
/// consumer sees the same slug space the resolver uses.
fn normalize_nav_paths(items: &mut [NavItem]) {
    for item in items {
        if let Some(path) = item.path.as_mut() {
            if !path.starts_with("http") {
                *path = normalize_route(path);
            }
        }
        normalize_nav_paths(&mut item.children);
    }
}
