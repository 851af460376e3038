//! Blog configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main blog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    // Site
    pub title: String,
    pub url: String,
    pub root: String,

    // Content
    pub content_dir: String,
    pub extension: String,
    pub route: String,
    pub static_dir: String,
    pub render_drafts: bool,
    pub cache: bool,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Serving
    #[serde(default)]
    pub server: ServerConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            content_dir: "content/blog".to_string(),
            extension: "svx".to_string(),
            route: "blog".to_string(),
            static_dir: "static".to_string(),
            render_drafts: false,
            cache: true,
            highlight: HighlightConfig::default(),

            server: ServerConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl BlogConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from YAML text. An empty document means defaults.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
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
            port: 4000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BlogConfig::default();
        assert_eq!(config.content_dir, "content/blog");
        assert_eq!(config.extension, "svx");
        assert_eq!(config.route, "blog");
        assert!(config.cache);
        assert!(!config.render_drafts);
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
content_dir: posts
extension: md
highlight:
  line_number: false
server:
  port: 8080
comments: disqus
"#;
        let config = BlogConfig::parse(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.content_dir, "posts");
        assert_eq!(config.extension, "md");
        assert!(!config.highlight.line_number);
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "localhost");
        assert_eq!(
            config.extra.get("comments"),
            Some(&serde_yaml::Value::String("disqus".to_string()))
        );
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = BlogConfig::parse("\n").unwrap();
        assert_eq!(config.route, "blog");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(BlogConfig::parse("server: [1, 2]").is_err());
    }
}
