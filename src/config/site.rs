//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::DEFAULT_WORDS_PER_MINUTE;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,

    // Directory
    pub content_dir: String,
    pub assets_dir: String,

    // Rendering
    /// URL prefix under which authored images are served
    pub asset_prefix: String,
    pub words_per_minute: u32,
    #[serde(default)]
    pub highlight: HighlightConfig,

    #[serde(default)]
    pub listing: ListingConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Inkwell".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            url: "http://localhost:4000".to_string(),

            content_dir: "posts".to_string(),
            assets_dir: "public".to_string(),

            asset_prefix: "/assets".to_string(),
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            highlight: HighlightConfig::default(),

            listing: ListingConfig::default(),

            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// URL path the asset directory is mounted at, always starting with `/`
    pub fn asset_mount(&self) -> String {
        let trimmed = self.asset_prefix.trim_matches('/');
        if trimmed.is_empty() {
            "/assets".to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Name of a syntect built-in theme
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// What the listing does with a post whose file cannot be read or parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Fail the whole listing
    #[default]
    Abort,
    /// Log a warning and leave the post out
    Skip,
}

/// Post listing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub on_malformed: MalformedPolicy,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "posts");
        assert_eq!(config.asset_prefix, "/assets");
        assert_eq!(config.words_per_minute, 200);
        assert_eq!(config.listing.on_malformed, MalformedPolicy::Abort);
        assert!(!config.highlight.line_number);
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
content_dir: content/posts
words_per_minute: 250
highlight:
  theme: InspiredGitHub
listing:
  on_malformed: skip
server:
  port: 8080
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.content_dir, "content/posts");
        assert_eq!(config.words_per_minute, 250);
        assert_eq!(config.highlight.theme, "InspiredGitHub");
        assert!(!config.highlight.line_number);
        assert_eq!(config.listing.on_malformed, MalformedPolicy::Skip);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "localhost");
        assert_eq!(config.asset_prefix, "/assets");
    }

    #[test]
    fn test_load_reports_bad_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "listing:\n  on_malformed: explode\n").unwrap();
        let err = SiteConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn test_asset_mount() {
        let mut config = SiteConfig::default();
        assert_eq!(config.asset_mount(), "/assets");
        config.asset_prefix = "static/".to_string();
        assert_eq!(config.asset_mount(), "/static");
        config.asset_prefix = "/".to_string();
        assert_eq!(config.asset_mount(), "/assets");
    }
}
