//! Errors raised while loading a post

use thiserror::Error;

/// A post could not be found or failed to load.
///
/// All variants describe the same failure from the caller's point of view;
/// they are kept apart so the server can pick a status code and the logs say
/// what went wrong.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no post found for slug '{0}'")]
    NotFound(String),

    #[error("invalid slug '{0}'")]
    InvalidSlug(String),

    #[error("failed to read post '{slug}': {source}")]
    Read {
        slug: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed front-matter in post '{slug}': {message}")]
    FrontMatter { slug: String, message: String },
}

impl LoadError {
    /// Whether the failure means "there is no such post".
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound(_) | LoadError::InvalidSlug(_))
    }

    /// Attach a slug to a front-matter parse failure
    pub(crate) fn front_matter(slug: &str, message: impl ToString) -> Self {
        LoadError::FrontMatter {
            slug: slug.to_string(),
            message: message.to_string(),
        }
    }
}
