//! Post slugs

use serde::{Deserialize, Serialize};
use std::fmt;

use super::LoadError;

/// URL identifier of a single post, used verbatim as the file stem of its
/// content file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Accept a slug as long as it names a single file inside the content
    /// directory. No case folding or other normalization happens.
    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let escapes_dir = raw.is_empty()
            || raw == "."
            || raw == ".."
            || raw.contains(['/', '\\', '\0']);

        if escapes_dir {
            return Err(LoadError::InvalidSlug(raw.to_string()));
        }

        Ok(Self(raw.to_string()))
    }

    /// Build a slug from a free-form title ("Hello, World!" -> "hello-world")
    pub fn from_title(title: &str) -> Result<Self, LoadError> {
        Self::parse(&slug::slugify(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = LoadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}
