//! Defines the [`Post`] type and the loader that turns one blog's content
//! directory into an ordered list of posts. Loading is strict by design: a
//! published post with broken metadata fails the whole build rather than
//! silently producing a page with holes in it. Only drafts are skipped.

use std::fmt;
use std::fs::{read_dir, read_to_string};
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::frontmatter::{self, Document, Frontmatter};

/// One published post, immutable once loaded.
#[derive(Debug)]
pub struct Post {
    /// The content file's name less the `.md` extension; used in the output
    /// path (`blogs/{blog}/posts/{slug}.html`) and in links.
    pub slug: String,

    pub title: String,

    /// The first 10 characters of the frontmatter value -- the `YYYY-MM-DD`
    /// prefix. Calendar validity is not checked; ordering and the
    /// recently-updated window both compare these lexicographically.
    pub date: String,

    pub author: String,

    /// Empty when the frontmatter has no `excerpt`.
    pub excerpt: String,

    /// Empty unless the frontmatter value is an actual sequence.
    pub tags: Vec<String>,

    /// The raw body, rendered by [`crate::markup`] when the post page is
    /// assembled.
    pub content: String,
}

const MARKDOWN_EXTENSION: &str = ".md";

/// Loads every published post for one blog, sorted by date, newest first.
/// Same-date posts keep directory-enumeration order (the sort is stable);
/// nothing should rely on that.
///
/// Each `*.md` file in `dir` is split by the injected [`Frontmatter`]
/// parser. A truthy `draft` flag excludes the file before anything else is
/// checked. After that, `title`, `date`, and `author` must be present and
/// non-empty or the load fails, naming the blog, the file, and every missing
/// field. A blog whose content directory does not exist yet has zero posts.
pub fn load_posts(blog: &str, dir: &Path, fm: &dyn Frontmatter) -> Result<Vec<Post>> {
    let mut posts = Vec::new();
    if !dir.is_dir() {
        return Ok(posts);
    }

    for result in read_dir(dir)? {
        let entry = result?;
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if !file_name.ends_with(MARKDOWN_EXTENSION) {
            continue;
        }
        let raw = read_to_string(entry.path())?;
        let doc = fm.parse(&raw).map_err(|err| Error::Frontmatter {
            blog: blog.to_owned(),
            file: file_name.to_string(),
            err,
        })?;
        if let Some(post) = from_document(blog, &file_name, doc)? {
            posts.push(post);
        }
    }

    posts.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(posts)
}

/// Builds a [`Post`] from a split document, or `None` for drafts.
fn from_document(blog: &str, file: &str, doc: Document) -> Result<Option<Post>> {
    let draft = frontmatter::field(&doc.data, "draft")
        .map(frontmatter::truthy)
        .unwrap_or(false);
    if draft {
        return Ok(None);
    }

    let title = required(&doc.data, "title");
    let date = required(&doc.data, "date");
    let author = required(&doc.data, "author");

    let mut missing = Vec::new();
    if title.is_none() {
        missing.push("title");
    }
    if date.is_none() {
        missing.push("date");
    }
    if author.is_none() {
        missing.push("author");
    }

    match (title, date, author) {
        (Some(title), Some(date), Some(author)) => Ok(Some(Post {
            slug: file.strip_suffix(MARKDOWN_EXTENSION).unwrap_or(file).to_owned(),
            title,
            date: date.chars().take(10).collect(),
            author,
            excerpt: frontmatter::field(&doc.data, "excerpt")
                .and_then(frontmatter::scalar)
                .unwrap_or_default(),
            tags: tag_list(&doc.data),
            content: doc.content,
        })),
        _ => Err(Error::MissingFields {
            blog: blog.to_owned(),
            file: file.to_owned(),
            fields: missing,
        }),
    }
}

/// A required field counts as present when it exists, is truthy, and has a
/// scalar string form.
fn required(data: &Mapping, name: &str) -> Option<String> {
    frontmatter::field(data, name)
        .filter(|value| frontmatter::truthy(value))
        .and_then(frontmatter::scalar)
}

/// Tags come through only as an actual sequence; a bare string, a number, or
/// absence all mean "no tags". Scalar entries are coerced to strings and
/// nested collections are dropped.
fn tag_list(data: &Mapping) -> Vec<String> {
    match frontmatter::field(data, "tags") {
        Some(Value::Sequence(seq)) => seq.iter().filter_map(frontmatter::scalar).collect(),
        _ => Vec::new(),
    }
}

/// Represents the result of a post-loading operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a blog's posts.
#[derive(Debug)]
pub enum Error {
    /// Returned when a published post lacks required frontmatter fields.
    /// This stops the whole build: broken source content has to be fixed
    /// before any output is trustworthy.
    MissingFields {
        blog: String,
        file: String,
        fields: Vec<&'static str>,
    },

    /// Returned when a content file's frontmatter cannot be split at all.
    Frontmatter {
        blog: String,
        file: String,
        err: frontmatter::Error,
    },

    /// Returned for I/O errors listing or reading content files.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingFields { blog, file, fields } => write!(
                f,
                "Post `{}` in blog `{}` is missing required frontmatter: {}",
                file,
                blog,
                fields.join(", ")
            ),
            Error::Frontmatter { blog, file, err } => {
                write!(f, "Parsing post `{}` in blog `{}`: {}", file, blog, err)
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingFields { .. } => None,
            Error::Frontmatter { err, .. } => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
