//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{BlogError, Result};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub footer: String,
    pub language: String,

    // Content
    pub posts_dir: String,
    pub order_by: PostOrder,

    // Page assets
    pub mathjax_cdn: String,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Server
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Academic Blog".to_string(),
            footer: "Academic Blog · Built with Rust".to_string(),
            language: "en".to_string(),

            posts_dir: "posts".to_string(),
            order_by: PostOrder::None,

            mathjax_cdn: "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-chtml.js".to_string(),
            highlight: HighlightConfig::default(),

            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| BlogError::io(path, e))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .map_err(|e| BlogError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Ordering applied to the index listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostOrder {
    /// Keep the directory enumeration order
    #[default]
    #[serde(rename = "none")]
    None,
    /// Oldest first
    #[serde(rename = "date")]
    DateAsc,
    /// Newest first
    #[serde(rename = "-date")]
    DateDesc,
    #[serde(rename = "title")]
    Title,
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
            theme: "InspiredGitHub".to_string(),
            line_number: false,
        }
    }
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
            port: 8080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Academic Blog");
        assert_eq!(config.posts_dir, "posts");
        assert_eq!(config.order_by, PostOrder::None);
        assert_eq!(config.highlight.theme, "InspiredGitHub");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Notes on Topology
posts_dir: content
order_by: -date
highlight:
  line_number: true
server:
  port: 3000
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Notes on Topology");
        assert_eq!(config.posts_dir, "content");
        assert_eq!(config.order_by, PostOrder::DateDesc);
        assert!(config.highlight.line_number);
        assert_eq!(config.highlight.theme, "InspiredGitHub");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.ip, "localhost");
    }

    #[test]
    fn test_load_rejects_bad_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "order_by: [sideways").unwrap();
        let err = SiteConfig::load(&path).unwrap_err();
        assert!(matches!(err, BlogError::Config(_)));
    }
}
