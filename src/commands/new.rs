//! Create a new post

use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::{DirStore, Slug};
use crate::Blog;

/// Scaffold `<content_dir>/<slug>.<extension>` with front-matter.
///
/// The slug defaults to the slugified title. Existing files are never
/// overwritten.
pub fn create_post(blog: &Blog, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => Slug::parse(s)?,
        None => Slug::from_title(title)?,
    };

    fs::create_dir_all(&blog.content_dir)?;

    let store = DirStore::new(&blog.content_dir, &blog.config.extension);
    let file_path = store.path_for(&slug);
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Local::now();
    let content = format!(
        "---\ntitle: {}\ndate: {}\n---\n",
        yaml_string(title),
        now.format("%Y-%m-%d %H:%M:%S")
    );
    fs::write(&file_path, content)?;

    tracing::info!("Created post {} at {:?}", slug, file_path);
    Ok(file_path)
}

/// Quote a title so YAML reads it back as the same string
fn yaml_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
