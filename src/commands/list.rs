//! List posts

use anyhow::Result;

use crate::content::PostSummary;
use crate::Blog;

/// Print every published post, newest first
pub async fn run(blog: &Blog) -> Result<()> {
    let posts = blog.list_posts().await?;
    println!("Posts ({}):", posts.len());
    for post in &posts {
        println!("  {}", format_line(post));
    }
    Ok(())
}

/// `date - title [slug]`, with blanks for missing fields
fn format_line(post: &PostSummary) -> String {
    let date = post
        .metadata
        .date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    let title = post.metadata.title().unwrap_or(post.slug.as_str());
    format!("{} - {} [{}]", date, title, post.slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Metadata, Slug};
    use serde_json::json;

    fn summary(slug: &str, metadata: serde_json::Value) -> PostSummary {
        let metadata: Metadata = serde_json::from_value(metadata).unwrap();
        PostSummary {
            slug: Slug::parse(slug).unwrap(),
            path: format!("/blog/{}", slug),
            metadata,
            excerpt: None,
        }
    }

    #[test]
    fn test_format_line() {
        let post = summary("foo", json!({ "title": "Foo", "date": "2024-02-03" }));
        assert_eq!(format_line(&post), "2024-02-03 - Foo [foo]");
    }

    #[test]
    fn test_format_line_without_metadata() {
        let post = summary("bare", json!({}));
        assert_eq!(format_line(&post), "---------- - bare [bare]");
    }
}
