//! svx-blog: load blog posts by slug
//!
//! Each post is a `<slug>.svx` file made of front-matter metadata and a
//! Markdown body. Loading a slug returns the rendered body together with the
//! metadata, ready for a page template.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{DirStore, LoadError, MarkdownRenderer, Post, PostLoader, PostSummary};

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Blog configuration
    pub config: config::BlogConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding one content file per post
    pub content_dir: PathBuf,
    /// Directory served as static files
    pub static_dir: PathBuf,
    loader: Arc<PostLoader>,
}

impl Blog {
    /// Create a new blog from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::BlogConfig::load(&config_path)?
        } else {
            config::BlogConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a blog with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::BlogConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let static_dir = base_dir.join(&config.static_dir);

        let store = DirStore::new(&content_dir, &config.extension);
        let renderer =
            MarkdownRenderer::with_options(&config.highlight.theme, config.highlight.line_number);
        let loader = PostLoader::new(Arc::new(store))
            .with_renderer(renderer)
            .with_cache(config.cache)
            .with_route(&config.root, &config.route)
            .with_drafts(config.render_drafts);

        Self {
            config,
            base_dir,
            content_dir,
            static_dir,
            loader: Arc::new(loader),
        }
    }

    pub fn loader(&self) -> &PostLoader {
        &self.loader
    }

    /// Load one post by slug
    pub async fn load_post(&self, slug: &str) -> Result<Post, LoadError> {
        self.loader.load(slug).await
    }

    /// List published posts, newest first
    pub async fn list_posts(&self) -> Result<Vec<PostSummary>, LoadError> {
        self.loader.list().await
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, slug: Option<&str>) -> Result<PathBuf> {
        commands::new::create_post(self, title, slug)
    }
}
