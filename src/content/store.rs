//! Content stores - where post sources come from

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{LoadError, Slug};

/// Read-only lookup of post sources keyed by slug
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Raw source text of the post with this slug
    async fn read(&self, slug: &Slug) -> Result<String, LoadError>;

    /// Every slug the store can serve, sorted
    async fn slugs(&self) -> Result<Vec<Slug>, LoadError>;
}

/// One file per post, named `<slug>.<extension>`, in a single directory
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
    extension: String,
}

impl DirStore {
    pub fn new<P: AsRef<Path>>(dir: P, extension: &str) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Path of the content file for a slug
    pub fn path_for(&self, slug: &Slug) -> PathBuf {
        self.dir.join(format!("{}.{}", slug, self.extension))
    }

    fn slug_of(&self, path: &Path) -> Option<Slug> {
        let has_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension)
            .unwrap_or(false);
        if !has_extension {
            return None;
        }

        path.file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| Slug::parse(s).ok())
    }
}

#[async_trait]
impl ContentStore for DirStore {
    async fn read(&self, slug: &Slug) -> Result<String, LoadError> {
        let path = self.path_for(slug);
        tracing::debug!("Reading {:?}", path);

        match tokio::fs::read_to_string(&path).await {
            Ok(source) => Ok(source),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(LoadError::NotFound(slug.to_string())),
            Err(source) => Err(LoadError::Read {
                slug: slug.to_string(),
                source,
            }),
        }
    }

    async fn slugs(&self) -> Result<Vec<Slug>, LoadError> {
        let store = self.clone();
        let listed = tokio::task::spawn_blocking(move || {
            if !store.dir.exists() {
                return Vec::new();
            }

            WalkDir::new(&store.dir)
                .min_depth(1)
                .max_depth(1)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| store.slug_of(e.path()))
                .collect::<Vec<_>>()
        })
        .await;

        let mut slugs = listed.map_err(|e| LoadError::Read {
            slug: self.dir.display().to_string(),
            source: std::io::Error::new(ErrorKind::Other, e),
        })?;
        slugs.sort();
        Ok(slugs)
    }
}

/// Post sources held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    posts: HashMap<Slug, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a post source
    pub fn insert(&mut self, slug: Slug, source: impl Into<String>) -> Option<String> {
        self.posts.insert(slug, source.into())
    }

    /// Builder-style [`MemoryStore::insert`] for string slugs
    pub fn with_post(mut self, slug: &str, source: impl Into<String>) -> Result<Self, LoadError> {
        self.insert(Slug::parse(slug)?, source);
        Ok(self)
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn read(&self, slug: &Slug) -> Result<String, LoadError> {
        self.posts
            .get(slug)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(slug.to_string()))
    }

    async fn slugs(&self) -> Result<Vec<Slug>, LoadError> {
        let mut slugs: Vec<_> = self.posts.keys().cloned().collect();
        slugs.sort();
        Ok(slugs)
    }
}
