//! The metadata-extraction seam. A [`Frontmatter`] implementation performs
//! one operation: split a raw content file into a metadata mapping and the
//! remaining body text. The orchestrator constructs a single concrete parser
//! up front and passes it wherever posts are loaded, so the loader never
//! resolves a parser on its own.

use std::fmt;

use serde_yaml::{Mapping, Value};

/// A split content file: the leading key/value block as a YAML mapping, and
/// everything after it.
pub struct Document {
    pub data: Mapping,
    pub content: String,
}

/// Extracts metadata from raw content text.
pub trait Frontmatter {
    fn parse(&self, raw: &str) -> Result<Document>;
}

/// The standard implementation: a leading `---`-fenced YAML block. Each post
/// file looks like:
///
/// ```md
/// ---
/// title: Hello, world!
/// date: 2024-04-16
/// author: kawa
/// tags: [greet]
/// ---
/// # Hello
///
/// World
/// ```
///
/// A file with no opening fence is all body with an empty mapping; an
/// opening fence that is never closed is an error; an empty block between
/// fences is an empty mapping.
pub struct YamlFrontmatter;

const FENCE: &str = "---";

impl Frontmatter for YamlFrontmatter {
    fn parse(&self, raw: &str) -> Result<Document> {
        let input = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        // The opening fence must be a complete first line.
        let after_open = match input.strip_prefix(FENCE).and_then(strip_newline) {
            Some(rest) => rest,
            None => {
                return Ok(Document {
                    data: Mapping::new(),
                    content: input.to_owned(),
                })
            }
        };

        let (yaml, body_start) = match find_closing_fence(after_open) {
            Some(split) => split,
            None => return Err(Error::MissingEndFence),
        };

        let data = match yaml.trim() {
            "" => Mapping::new(),
            trimmed => serde_yaml::from_str(trimmed)?,
        };
        Ok(Document {
            data,
            content: after_open[body_start..].to_owned(),
        })
    }
}

/// Finds the closing `---` line inside `block`. Returns the YAML text before
/// it and the byte offset where the body starts (just past the fence line's
/// newline, so the body does not begin with a spurious blank line). The
/// fence may be the very first line, which is how an empty metadata block
/// looks from here.
fn find_closing_fence(block: &str) -> Option<(&str, usize)> {
    let mut line_start = 0;
    loop {
        if block[line_start..].starts_with(FENCE) {
            let after_fence = &block[line_start + FENCE.len()..];
            if after_fence.is_empty() {
                return Some((&block[..line_start], block.len()));
            }
            if let Some(body) = strip_newline(after_fence) {
                return Some((&block[..line_start], block.len() - body.len()));
            }
            // `---` was a prefix of a longer line, not a fence.
        }
        match block[line_start..].find('\n') {
            Some(offset) => line_start += offset + 1,
            None => return None,
        }
    }
}

fn strip_newline(s: &str) -> Option<&str> {
    s.strip_prefix("\r\n").or_else(|| s.strip_prefix('\n'))
}

/// Returns the named metadata field, if present.
pub fn field<'a>(data: &'a Mapping, name: &str) -> Option<&'a Value> {
    data.get(&Value::String(name.to_owned()))
}

/// Coerces a scalar metadata value to its string form. Nulls, sequences, and
/// mappings have none.
pub fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Truthiness for flag fields like `draft`: null, `false`, zero, and the
/// empty string don't count; everything else does.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Represents the result of a frontmatter-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error splitting metadata from a content file.
#[derive(Debug)]
pub enum Error {
    /// Returned when a document opens a frontmatter fence (`---`) and never
    /// closes it.
    MissingEndFence,

    /// Returned when the fenced block is not a valid YAML mapping.
    Yaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingEndFence => write!(f, "Frontmatter fence `---` is never closed"),
            Error::Yaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingEndFence => None,
            Error::Yaml(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::Yaml(err)
    }
}
