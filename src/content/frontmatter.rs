//! Front-matter parsing

use indexmap::IndexMap;
use serde_json::Value as Json;
use serde_yaml::Value as Yaml;
use thiserror::Error;

use super::Metadata;

/// Front-matter that was recognised but could not be read
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("front-matter must be a mapping, found {0}")]
    NotAMapping(&'static str),

    #[error("front-matter keys must be scalars, found {0}")]
    NonScalarKey(&'static str),

    #[error("unterminated JSON front-matter")]
    Unterminated,
}

/// Split a content file into its metadata and its body.
///
/// Files without front-matter get empty metadata and keep their whole text
/// as the body.
pub fn split(content: &str) -> Result<(Metadata, &str), FrontMatterError> {
    let trimmed = content.trim_start();

    if trimmed.starts_with("---") {
        return split_yaml(trimmed);
    }

    if trimmed.starts_with(";;;") {
        return split_fenced_json(trimmed);
    }

    if trimmed.starts_with('{') {
        return Ok(split_bare_json(trimmed).unwrap_or_else(|| (Metadata::new(), content)));
    }

    Ok((Metadata::new(), content))
}

fn split_yaml(content: &str) -> Result<(Metadata, &str), FrontMatterError> {
    let Some((opening, rest)) = content.split_once('\n') else {
        return Ok((Metadata::new(), content));
    };
    if opening.trim_end() != "---" {
        return Ok((Metadata::new(), content));
    }

    // No closing fence, so this is a thematic break in the body
    let Some((yaml_end, body_start)) = closing_fence(rest) else {
        return Ok((Metadata::new(), content));
    };
    let yaml = &rest[..yaml_end];
    let remaining = rest[body_start..].trim_start_matches(['\n', '\r']);

    if yaml.trim().is_empty() {
        return Ok((Metadata::new(), remaining));
    }

    // A pair of `---` rules around prose is Markdown, not front-matter
    if !looks_like_yaml(yaml) {
        return Ok((Metadata::new(), content));
    }

    let value: Yaml = serde_yaml::from_str(yaml)?;
    let metadata = match value {
        Yaml::Null => Metadata::new(),
        Yaml::Mapping(mapping) => Metadata::from(yaml_mapping(mapping)?),
        Yaml::Bool(_) => return Err(FrontMatterError::NotAMapping("a boolean")),
        Yaml::Number(_) => return Err(FrontMatterError::NotAMapping("a number")),
        Yaml::String(_) => return Err(FrontMatterError::NotAMapping("a string")),
        Yaml::Sequence(_) => return Err(FrontMatterError::NotAMapping("a list")),
        Yaml::Tagged(_) => return Err(FrontMatterError::NotAMapping("a tagged value")),
    };

    Ok((metadata, remaining))
}

/// Start and end offsets of the first line in `rest` that is exactly `---`,
/// ignoring trailing whitespace.
fn closing_fence(rest: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((offset, offset + line.len()));
        }
        offset += line.len();
    }
    None
}

/// At least one line must read as `key: value` with a plain identifier key.
/// URLs such as `https://example.com` do not count.
fn looks_like_yaml(block: &str) -> bool {
    block.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }

        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };

        let key = &trimmed[..colon_pos];
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");

        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}

/// YAML allows any value as a key. Scalar keys become their string form
/// (`2024` → `"2024"`, `true` → `"true"`); list and mapping keys are rejected.
fn yaml_mapping(mapping: serde_yaml::Mapping) -> Result<IndexMap<String, Json>, FrontMatterError> {
    let mut map = IndexMap::with_capacity(mapping.len());
    for (key, value) in mapping {
        map.insert(yaml_key(key)?, yaml_to_json(value)?);
    }
    Ok(map)
}

fn yaml_key(key: Yaml) -> Result<String, FrontMatterError> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => yaml_key(tagged.value),
        Yaml::Sequence(_) => Err(FrontMatterError::NonScalarKey("a list")),
        Yaml::Mapping(_) => Err(FrontMatterError::NonScalarKey("a mapping")),
    }
}

fn yaml_to_json(value: Yaml) -> Result<Json, FrontMatterError> {
    Ok(match value {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Json::from(i)
            } else if let Some(u) = n.as_u64() {
                Json::from(u)
            } else {
                // .nan and .inf have no JSON form
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Json::Null, Json::Number)
            }
        }
        Yaml::String(s) => Json::String(s),
        Yaml::Sequence(items) => Json::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => Json::Object(yaml_mapping(mapping)?.into_iter().collect()),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

/// `;;; { ... } ;;;`
fn split_fenced_json(content: &str) -> Result<(Metadata, &str), FrontMatterError> {
    let rest = &content[3..];
    let end_pos = rest.find(";;;").ok_or(FrontMatterError::Unterminated)?;
    let json = &rest[..end_pos];
    let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);
    Ok((serde_json::from_str(json)?, remaining))
}

/// A JSON object at the very start of the file. Anything else that opens
/// with `{`, such as a Svelte `{#if}` block, belongs to the body.
fn split_bare_json(content: &str) -> Option<(Metadata, &str)> {
    let end_pos = matching_brace(content)?;
    let metadata = serde_json::from_str(&content[..end_pos]).ok()?;
    let remaining = content[end_pos..].trim_start_matches(['\n', '\r']);
    Some((metadata, remaining))
}

/// Byte offset just past the brace closing the object that opens `content`.
/// Braces inside JSON strings are skipped.
fn matching_brace(content: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in content.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}
