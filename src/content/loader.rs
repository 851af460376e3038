//! Post loader - resolves a slug to its rendered content and metadata

use std::cmp::Ordering;
use std::sync::Arc;

use super::{frontmatter, LoadError, MarkdownRenderer, Post, PostSummary, RenderedPost, Slug};
use crate::cache::{self, RenderCache};
use crate::content::store::ContentStore;

/// Loads posts from a content store
pub struct PostLoader {
    store: Arc<dyn ContentStore>,
    renderer: MarkdownRenderer,
    cache: Option<RenderCache<RenderedPost>>,
    root: String,
    route: String,
    render_drafts: bool,
}

impl PostLoader {
    /// Create a loader with the default renderer, caching on and posts
    /// mounted under `/blog`
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            renderer: MarkdownRenderer::new(),
            cache: Some(RenderCache::new()),
            root: "/".to_string(),
            route: "blog".to_string(),
            render_drafts: false,
        }
    }

    pub fn with_renderer(mut self, renderer: MarkdownRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Turn the render cache on or off
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(RenderCache::new);
        self
    }

    /// URL prefix used for the `path` of listed posts
    pub fn with_route(mut self, root: &str, route: &str) -> Self {
        self.root = root.to_string();
        self.route = route.to_string();
        self
    }

    /// Include `published: false` posts in listings
    pub fn with_drafts(mut self, render_drafts: bool) -> Self {
        self.render_drafts = render_drafts;
        self
    }

    /// Load the post with this slug.
    ///
    /// Fails when the slug has no content file or the file cannot be read
    /// or parsed. The error is returned as is; nothing is retried.
    pub async fn load(&self, slug: &str) -> Result<Post, LoadError> {
        let slug = Slug::parse(slug)?;
        let rendered = self.load_rendered(&slug).await?;
        Ok(rendered.post.clone())
    }

    /// Load a single post in its listing form
    pub async fn load_summary(&self, slug: &str) -> Result<PostSummary, LoadError> {
        let slug = Slug::parse(slug)?;
        let rendered = self.load_rendered(&slug).await?;
        Ok(rendered.summary(&slug, &self.root, &self.route))
    }

    /// All published posts, newest first.
    ///
    /// Posts that fail to load are logged and left out.
    pub async fn list(&self) -> Result<Vec<PostSummary>, LoadError> {
        let mut summaries = Vec::new();

        for slug in self.store.slugs().await? {
            match self.load_rendered(&slug).await {
                Ok(rendered) => {
                    if rendered.post.metadata.published() || self.render_drafts {
                        summaries.push(rendered.summary(&slug, &self.root, &self.route));
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to load post {}: {}", slug, e);
                }
            }
        }

        summaries.sort_by(newest_first);
        Ok(summaries)
    }

    async fn load_rendered(&self, slug: &Slug) -> Result<Arc<RenderedPost>, LoadError> {
        let source = match self.store.read(slug).await {
            Ok(source) => source,
            Err(e) => {
                if let Some(cache) = &self.cache {
                    cache.remove(slug);
                }
                return Err(e);
            }
        };

        let Some(cache) = &self.cache else {
            return self.render(slug, &source).map(Arc::new);
        };

        let hash = cache::hash_content(&source);
        if let Some(rendered) = cache.get(slug, hash) {
            tracing::debug!("Cache hit for {}", slug);
            return Ok(rendered);
        }

        tracing::debug!("Rendering {}", slug);
        match self.render(slug, &source) {
            Ok(rendered) => {
                let rendered = Arc::new(rendered);
                cache.insert(slug.clone(), hash, Arc::clone(&rendered));
                Ok(rendered)
            }
            Err(e) => {
                cache.remove(slug);
                Err(e)
            }
        }
    }

    fn render(&self, slug: &Slug, source: &str) -> Result<RenderedPost, LoadError> {
        let (metadata, body) =
            frontmatter::split(source).map_err(|e| LoadError::front_matter(slug.as_str(), e))?;

        let (excerpt_md, full_md) = MarkdownRenderer::split_excerpt(body);
        let content = self.renderer.render(&full_md);
        let excerpt = excerpt_md.map(|e| self.renderer.render(&e));

        Ok(RenderedPost {
            post: Post { content, metadata },
            excerpt,
        })
    }
}

/// Sort by date descending; undated posts go last, ties by slug
fn newest_first(a: &PostSummary, b: &PostSummary) -> Ordering {
    match (a.metadata.date(), b.metadata.date()) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.slug.cmp(&b.slug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::store::{DirStore, MemoryStore};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    const FOO: &str = "---\ntitle: Foo\n---\nHello";

    fn loader(store: MemoryStore) -> PostLoader {
        PostLoader::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_load_existing_post() {
        let loader = loader(MemoryStore::new().with_post("foo", FOO).unwrap());

        let post = loader.load("foo").await.unwrap();
        assert_eq!(post.content, "<p>Hello</p>\n");
        assert_eq!(
            serde_json::to_value(&post.metadata).unwrap(),
            json!({ "title": "Foo" })
        );
    }

    #[tokio::test]
    async fn test_load_missing_post_fails() {
        let loader = loader(MemoryStore::new().with_post("foo", FOO).unwrap());

        let err = loader.load("missing").await.unwrap_err();
        assert!(matches!(err, LoadError::NotFound(ref s) if s == "missing"));
    }

    #[tokio::test]
    async fn test_load_invalid_slug_fails() {
        let loader = loader(MemoryStore::new());

        for slug in ["", "..", "../foo", "a/b"] {
            let err = loader.load(slug).await.unwrap_err();
            assert!(matches!(err, LoadError::InvalidSlug(_)), "{slug:?}");
        }
    }

    #[tokio::test]
    async fn test_malformed_post_fails() {
        let source = "---\ntitle: [broken\n---\nbody";
        let loader = loader(MemoryStore::new().with_post("bad", source).unwrap());

        let err = loader.load("bad").await.unwrap_err();
        assert!(matches!(err, LoadError::FrontMatter { ref slug, .. } if slug == "bad"));
    }

    #[tokio::test]
    async fn test_metadata_passes_through_unchanged() {
        let source = r#"---
title: Foo
date: 2024-03-01
tags: [a, b]
draft_note: ~
weight: 2.5
series:
  name: Intro
  part: 1
---
Body
"#;
        let loader = loader(MemoryStore::new().with_post("foo", source).unwrap());

        let post = loader.load("foo").await.unwrap();
        let (expected, _) = frontmatter::split(source).unwrap();
        assert_eq!(post.metadata, expected);
        assert_eq!(
            post.metadata.keys().collect::<Vec<_>>(),
            vec!["title", "date", "tags", "draft_note", "weight", "series"]
        );
        assert_eq!(post.metadata.get("draft_note"), Some(&json!(null)));
        assert_eq!(post.metadata.get("series"), Some(&json!({ "name": "Intro", "part": 1 })));
    }

    #[tokio::test]
    async fn test_repeated_loads_are_equal() {
        for cached in [true, false] {
            let loader = loader(MemoryStore::new().with_post("foo", FOO).unwrap()).with_cache(cached);

            let first = loader.load("foo").await.unwrap();
            let second = loader.load("foo").await.unwrap();
            assert_eq!(first, second);
        }
    }

    #[tokio::test]
    async fn test_edits_are_picked_up_with_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("foo.svx");
        fs::write(&path, FOO).unwrap();

        let loader = PostLoader::new(Arc::new(DirStore::new(dir.path(), "svx")));
        assert_eq!(loader.load("foo").await.unwrap().content, "<p>Hello</p>\n");

        fs::write(&path, "---\ntitle: Foo v2\n---\nGoodbye").unwrap();
        let post = loader.load("foo").await.unwrap();
        assert_eq!(post.content, "<p>Goodbye</p>\n");
        assert_eq!(post.metadata.title(), Some("Foo v2"));

        fs::remove_file(&path).unwrap();
        assert!(loader.load("foo").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_excerpt_is_rendered_separately() {
        let source = "---\ntitle: Long\n---\nIntro.\n<!-- more -->\nRest.";
        let loader = loader(MemoryStore::new().with_post("long", source).unwrap());

        let post = loader.load("long").await.unwrap();
        assert!(post.content.contains("<p>Intro.</p>"));
        assert!(post.content.contains("<p>Rest.</p>"));

        let summary = loader.load_summary("long").await.unwrap();
        assert_eq!(summary.excerpt.as_deref(), Some("<p>Intro.</p>\n"));
        assert_eq!(summary.path, "/blog/long");
    }

    #[tokio::test]
    async fn test_list_newest_first_and_skips_broken() {
        let store = MemoryStore::new()
            .with_post("old", "---\ntitle: Old\ndate: 2023-01-01\n---\nold")
            .unwrap()
            .with_post("new", "---\ntitle: New\ndate: 2024-06-01\n---\nnew")
            .unwrap()
            .with_post("undated", "---\ntitle: Undated\n---\nundated")
            .unwrap()
            .with_post("broken", "---\ntitle: [oops\n---\nbroken")
            .unwrap();
        let loader = loader(store).with_route("/site/", "posts");

        let posts = loader.list().await.unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "old", "undated"]);
        assert_eq!(posts[0].path, "/site/posts/new");
    }

    #[tokio::test]
    async fn test_list_hides_drafts_unless_enabled() {
        let store = MemoryStore::new()
            .with_post("live", "---\ntitle: Live\n---\nlive")
            .unwrap()
            .with_post("draft", "---\ntitle: Draft\npublished: false\n---\ndraft")
            .unwrap();

        let hidden = loader(store.clone()).list().await.unwrap();
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].slug.as_str(), "live");

        let shown = loader(store.clone()).with_drafts(true).list().await.unwrap();
        assert_eq!(shown.len(), 2);

        // drafts stay loadable by slug
        assert!(loader(store).load("draft").await.is_ok());
    }

    #[tokio::test]
    async fn test_body_opening_with_svelte_block_loads() {
        let source = "{#if true}\n<p>Hi</p>\n{/if}\n\nHello";
        let loader = loader(MemoryStore::new().with_post("svelte", source).unwrap());

        let post = loader.load("svelte").await.unwrap();
        assert!(post.metadata.is_empty());
        assert!(post.content.contains("{#if true}"));
        assert!(post.content.contains("<p>Hello</p>"));
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_the_cache() {
        let store = MemoryStore::new()
            .with_post("a", "---\ntitle: A\n---\nAlpha")
            .unwrap()
            .with_post("b", "---\ntitle: B\n---\nBeta")
            .unwrap();
        let loader = loader(store);

        let (a1, b, a2, missing) = tokio::join!(
            loader.load("a"),
            loader.load("b"),
            loader.load("a"),
            loader.load("missing"),
        );

        let a1 = a1.unwrap();
        assert_eq!(a1, a2.unwrap());
        assert_eq!(a1.metadata.title(), Some("A"));
        assert_eq!(a1.content, "<p>Alpha</p>\n");
        assert_eq!(b.unwrap().content, "<p>Beta</p>\n");
        assert!(missing.unwrap_err().is_not_found());

        let cache = loader.cache.as_ref().unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&Slug::parse("missing").unwrap(), 0).is_none());
    }
}
