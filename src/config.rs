//! Site configuration: the `blogs.json` collection and the on-disk project
//! layout.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// One member blog of the site. The collection order in `blogs.json` is the
/// order blogs appear on the home page.
#[derive(Debug, Deserialize)]
pub struct Blog {
    pub slug: String,
    pub title: String,
    pub desc: String,
    pub author: String,

    /// The theme identifier. Absent or unrecognized values fall back to the
    /// default theme ([`crate::theme::Theme::parse`] is total).
    #[serde(default)]
    pub theme: String,

    pub planet: Planet,
}

/// The planet identity a blog renders under: an emoji plus Japanese and
/// English names.
#[derive(Debug, Deserialize)]
pub struct Planet {
    pub emoji: String,
    #[serde(rename = "nameJa")]
    pub name_ja: String,
    pub name: String,
}

/// Every location the build touches, resolved once at process start and
/// passed by parameter. Nothing downstream derives paths from the working
/// directory.
pub struct Paths {
    /// The `blogs.json` configuration document.
    pub config_file: PathBuf,

    /// Per-blog content directories: `{content}/{blog-slug}/*.md`.
    pub content: PathBuf,

    /// Theme template directories plus the shared `home.html` / `404.html`.
    pub templates: PathBuf,

    /// Static assets copied verbatim into the output.
    pub static_dir: PathBuf,

    /// The output root. Deleted and recreated on every run.
    pub output: PathBuf,
}

impl Paths {
    /// Lays out the standard project structure under `root`.
    pub fn new(root: &Path, output: PathBuf) -> Paths {
        Paths {
            config_file: root.join("blogs.json"),
            content: root.join("content"),
            templates: root.join("templates"),
            static_dir: root.join("static"),
            output,
        }
    }
}

/// Loads the ordered blog collection from `blogs.json`. A missing or
/// malformed configuration file fails the whole build.
pub fn load_blogs(path: &Path) -> Result<Vec<Blog>> {
    let file = open(path, "blog configuration")?;
    match serde_json::from_reader(file) {
        Ok(blogs) => Ok(blogs),
        Err(e) => Err(anyhow!(
            "Parsing blog configuration `{}`: {}",
            path.display(),
            e
        )),
    }
}

fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}
