//! Content module - slugs, content stores, front-matter and rendering

mod error;
pub mod frontmatter;
pub mod loader;
mod markdown;
mod metadata;
mod post;
mod slug;
pub mod store;

pub use error::LoadError;
pub use loader::PostLoader;
pub use markdown::{MarkdownRenderer, MORE_MARKER};
pub use metadata::{parse_date_string, Metadata};
pub use post::{post_path, Post, PostSummary, RenderedPost};
pub use slug::Slug;
pub use store::{ContentStore, DirStore, MemoryStore};
