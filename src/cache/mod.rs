//! Render cache for loaded posts
//!
//! Rendering Markdown with syntax highlighting is far more expensive than
//! reading the source, so the loader always reads the source and only skips
//! rendering when the source hash matches the cached entry. Edits to a post
//! therefore show up on the next load.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

use crate::content::Slug;

/// A rendered value together with the hash of the source it came from
#[derive(Debug)]
struct CacheEntry<T> {
    content_hash: u64,
    value: Arc<T>,
}

/// Thread-safe map from slug to the last value rendered for it
#[derive(Debug)]
pub struct RenderCache<T> {
    entries: RwLock<HashMap<Slug, CacheEntry<T>>>,
}

impl<T> Default for RenderCache<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> RenderCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached value, if it was rendered from a source with this hash
    pub fn get(&self, slug: &Slug, content_hash: u64) -> Option<Arc<T>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(slug)
            .filter(|entry| entry.content_hash == content_hash)
            .map(|entry| Arc::clone(&entry.value))
    }

    pub fn insert(&self, slug: Slug, content_hash: u64, value: Arc<T>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(slug, CacheEntry { content_hash, value });
    }

    pub fn remove(&self, slug: &Slug) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(slug);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Calculate a hash for file content
pub fn hash_content(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(content: &str) -> Arc<String> {
        Arc::new(content.to_string())
    }

    #[test]
    fn test_hash_content() {
        assert_eq!(hash_content("same"), hash_content("same"));
        assert_ne!(hash_content("one"), hash_content("two"));
    }

    #[test]
    fn test_hit_requires_matching_hash() {
        let cache = RenderCache::<String>::new();
        let slug = Slug::parse("foo").unwrap();
        cache.insert(slug.clone(), 1, value("<p>one</p>"));

        assert_eq!(cache.get(&slug, 1).unwrap().as_str(), "<p>one</p>");
        assert!(cache.get(&slug, 2).is_none());
    }

    #[test]
    fn test_insert_replaces_entry() {
        let cache = RenderCache::<String>::new();
        let slug = Slug::parse("foo").unwrap();
        cache.insert(slug.clone(), 1, value("old"));
        cache.insert(slug.clone(), 2, value("new"));

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&slug, 1).is_none());
        assert_eq!(cache.get(&slug, 2).unwrap().as_str(), "new");
    }

    #[test]
    fn test_remove() {
        let cache = RenderCache::<String>::new();
        let foo = Slug::parse("foo").unwrap();
        let bar = Slug::parse("bar").unwrap();
        cache.insert(foo.clone(), 1, value("foo"));
        cache.insert(bar, 1, value("bar"));

        cache.remove(&foo);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&foo, 1).is_none());
        cache.remove(&foo);
        assert!(!cache.is_empty());
    }
}
