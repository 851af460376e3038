//! Print one post as page data

use anyhow::Result;

use crate::Blog;

/// Load a post and print `{ content, metadata }` as JSON
pub async fn run(blog: &Blog, slug: &str) -> Result<()> {
    let post = blog.load_post(slug).await?;
    println!("{}", serde_json::to_string_pretty(&post)?);
    Ok(())
}
