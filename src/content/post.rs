//! Post models

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

use super::{Metadata, Slug};

/// Characters escaped when a slug becomes a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Page data for a single post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Rendered HTML body
    pub content: String,

    /// Front-matter, exactly as written in the source file
    pub metadata: Metadata,
}

/// A post as it appears in the blog index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub slug: Slug,

    /// URL path of the post page
    pub path: String,

    pub metadata: Metadata,

    /// Rendered text before the `<!-- more -->` marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

/// Everything rendered from one source file
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPost {
    pub post: Post,
    pub excerpt: Option<String>,
}

impl RenderedPost {
    pub fn summary(&self, slug: &Slug, root: &str, route: &str) -> PostSummary {
        PostSummary {
            slug: slug.clone(),
            path: post_path(root, route, slug),
            metadata: self.post.metadata.clone(),
            excerpt: self.excerpt.clone(),
        }
    }
}

/// URL path of a post: `<root><route>/<slug>`
pub fn post_path(root: &str, route: &str, slug: &Slug) -> String {
    let root = root.trim_end_matches('/');
    let route = route.trim_matches('/');
    let slug = utf8_percent_encode(slug.as_str(), PATH_SEGMENT);

    if route.is_empty() {
        format!("{}/{}", root, slug)
    } else {
        format!("{}/{}/{}", root, route, slug)
    }
}
