//! Builds the site-wide Atom feed from the newest posts across every blog.

use crate::config::Blog;
use crate::post::Post;
use atom_syndication::{
    Entry, EntryBuilder, Error as AtomError, FeedBuilder, FixedDateTime, LinkBuilder,
    PersonBuilder, Text,
};
use chrono::{DateTime, Offset, Utc};
use std::fmt;
use std::io::Write;

/// Site-level identity stamped onto the feed.
pub struct FeedConfig {
    pub title: String,

    /// Absolute URL prefix entries are linked under, without a trailing
    /// slash.
    pub base_url: String,
}

/// Writes an Atom feed for the given posts to `w`. The slice is expected
/// newest first, the order the home page uses. Posts whose dates do not parse
/// as `YYYY-MM-DD` are left out of the feed rather than failing the build;
/// the site pages still carry them.
pub fn write_feed<W: Write>(config: &FeedConfig, posts: &[(&Blog, &Post)], w: W) -> Result<()> {
    let feed = FeedBuilder::default()
        .title(Text::plain(config.title.clone()))
        .id(format!("{}/", config.base_url))
        .updated(Utc::now().with_timezone(&Utc.fix()))
        .links(vec![LinkBuilder::default()
            .href(format!("{}/", config.base_url))
            .rel("alternate")
            .build()])
        .entries(entries(config, posts))
        .build();
    feed.write_to(w)?;
    Ok(())
}

fn entries(config: &FeedConfig, posts: &[(&Blog, &Post)]) -> Vec<Entry> {
    let mut entries = Vec::with_capacity(posts.len());
    for (blog, post) in posts {
        let date = match midnight_utc(&post.date) {
            Some(date) => date,
            None => continue,
        };
        let url = format!(
            "{}/blogs/{}/posts/{}.html",
            config.base_url, blog.slug, post.slug
        );
        entries.push(
            EntryBuilder::default()
                .title(Text::plain(post.title.clone()))
                .id(url.clone())
                .updated(date)
                .published(date)
                .authors(vec![PersonBuilder::default()
                    .name(post.author.clone())
                    .build()])
                .links(vec![LinkBuilder::default().href(url).rel("alternate").build()])
                .summary(Text::plain(post.excerpt.clone()))
                .build(),
        );
    }
    entries
}

/// Interprets a `YYYY-MM-DD` date as midnight UTC, the precision Atom wants.
fn midnight_utc(date: &str) -> Option<FixedDateTime> {
    DateTime::parse_from_rfc3339(&format!("{}T00:00:00Z", date)).ok()
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem serializing the feed.
#[derive(Debug)]
pub enum Error {
    /// Returned when the feed cannot be written as Atom XML.
    Atom(AtomError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Atom(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Atom(err) => Some(err),
        }
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}
