//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output site: loading posts ([`crate::post`]),
//! rendering per-blog and per-post pages through the theme fragment builders
//! ([`crate::theme`]) and the template engine ([`crate::template`]), writing
//! the aggregated home page, generating the Atom feed, and copying the static
//! assets directory.

use crate::config::{Blog, Paths};
use crate::console;
use crate::escape;
use crate::feed::{self, Error as FeedError, FeedConfig};
use crate::frontmatter::Frontmatter;
use crate::markup;
use crate::post::{self, Error as PostError, Post};
use crate::template::{self, Vars};
use crate::theme::{self, Nav, Style, Theme};
use chrono::{Duration, NaiveDate, Utc};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The site-level heading stamped onto the home page and the feed.
const SITE_TITLE: &str = "Planet Blogs";

/// How many posts the home page and the feed carry.
const HOME_LATEST_COUNT: usize = 10;

/// Builds the whole site into `paths.output`. The output directory is deleted
/// and recreated on every run, so nothing stale survives a rename or a
/// removed post. Any missing template is fatal: every generated page
/// references the shared templates, so a partial tree would be broken on
/// publish anyway.
pub fn build_site(
    paths: &Paths,
    blogs: &[Blog],
    base_url: &str,
    frontmatter: &dyn Frontmatter,
) -> Result<()> {
    rmdir(&paths.output)?;
    std::fs::create_dir_all(&paths.output)?;
    console::status("build", &format!("output {}", paths.output.display()));

    // Load every blog's posts up front so the home page can aggregate them
    // after the per-blog pages are written.
    let mut site: Vec<(&Blog, Vec<Post>)> = Vec::with_capacity(blogs.len());
    for blog in blogs {
        let posts = post::load_posts(&blog.slug, &paths.content.join(&blog.slug), frontmatter)?;
        site.push((blog, posts));
    }

    for (blog, posts) in &site {
        write_blog(paths, blog, posts)?;
        console::status("blog", &format!("{} ({} posts)", blog.slug, posts.len()));
    }

    let mut all: Vec<(&Blog, &Post)> = Vec::new();
    for (blog, posts) in &site {
        for post in posts {
            all.push((*blog, post));
        }
    }
    // Stable sort: blogs earlier in the configuration win date ties.
    all.sort_by(|a, b| b.1.date.cmp(&a.1.date));
    let latest = &all[..all.len().min(HOME_LATEST_COUNT)];

    let today = Utc::now().date_naive();
    let home_template = read_template(&paths.templates.join("home.html"))?;
    let mut vars = Vars::new();
    vars.set("SITE_TITLE", SITE_TITLE);
    vars.set("BUILD_DATE", today.format("%Y-%m-%d").to_string());
    vars.set("BLOG_TABLE_ROWS", blog_table_rows(&site, &cutoff_date(today)));
    vars.set("TOTAL_BLOGS", site.len().to_string());
    vars.set("TOTAL_POSTS", all.len().to_string());
    vars.set_opt("LATEST_DATE", all.first().map(|(_, post)| escape::html(&post.date)));
    vars.set("LATEST_POSTS", latest_posts(latest));
    std::fs::write(
        paths.output.join("index.html"),
        template::render(&home_template, &vars),
    )?;

    // The not-found page carries no placeholders; it is copied through as-is.
    let not_found = read_template(&paths.templates.join("404.html"))?;
    std::fs::write(paths.output.join("404.html"), not_found)?;
    std::fs::write(paths.output.join(".nojekyll"), "")?;

    let feed_config = FeedConfig {
        title: SITE_TITLE.to_owned(),
        base_url: base_url.to_owned(),
    };
    feed::write_feed(
        &feed_config,
        latest,
        File::create(paths.output.join("feed.atom"))?,
    )?;
    console::status("feed", "feed.atom");

    copy_static(&paths.static_dir, &paths.output.join("static"))?;

    Ok(())
}

/// Writes one blog's index page and every post page under
/// `blogs/{slug}/`. Both templates come from the blog's theme directory.
fn write_blog(paths: &Paths, blog: &Blog, posts: &[Post]) -> Result<()> {
    let theme = Theme::parse(&blog.theme);
    let style = theme.style();
    let theme_dir = paths.templates.join(theme.dir());
    let list_template = read_template(&theme_dir.join("blog-list.html"))?;
    let post_template = read_template(&theme_dir.join("post.html"))?;

    let blog_dir = paths.output.join("blogs").join(&blog.slug);
    let posts_dir = blog_dir.join("posts");
    std::fs::create_dir_all(&posts_dir)?;

    let html = template::render(&list_template, &blog_page_vars(blog, style, posts));
    std::fs::write(blog_dir.join("index.html"), html)?;

    for (i, post) in posts.iter().enumerate() {
        let html = template::render(&post_template, &post_page_vars(blog, style, posts, i));
        std::fs::write(posts_dir.join(format!("{}.html", post.slug)), html)?;
    }

    Ok(())
}

fn blog_page_vars(blog: &Blog, style: &Style, posts: &[Post]) -> Vars {
    let mut vars = Vars::new();
    vars.set("BLOG_TITLE", escape::html(&blog.title));
    vars.set("BLOG_DESC", escape::html(&blog.desc));
    vars.set("BLOG_AUTHOR", escape::html(&blog.author));
    vars.set("BLOG_EMOJI", escape::html(&blog.planet.emoji));
    vars.set("BLOG_SLUG", escape::html(&blog.slug));
    vars.set("PLANET_JA", escape::html(&blog.planet.name_ja));
    vars.set("PLANET_EN", escape::html(&blog.planet.name));
    vars.set("POST_COUNT", posts.len().to_string());
    vars.set_opt("LATEST_DATE", posts.first().map(|post| escape::html(&post.date)));
    vars.set("POST_LIST", theme::post_list(style, &blog.slug, posts));
    vars.set("TAG_FILTER", theme::tag_filter(style, posts));
    vars
}

/// Posts are ordered newest first, so the previous (older) post sits at
/// `i + 1` and the next (newer) one at `i - 1`.
fn post_page_vars(blog: &Blog, style: &Style, posts: &[Post], i: usize) -> Vars {
    let post = &posts[i];
    let prev = posts.get(i + 1);
    let next = i.checked_sub(1).and_then(|j| posts.get(j));

    let mut vars = Vars::new();
    vars.set("POST_TITLE", escape::html(&post.title));
    vars.set("POST_DATE", escape::html(&post.date));
    vars.set("POST_AUTHOR", escape::html(&post.author));
    vars.set("POST_EXCERPT", escape::html(&post.excerpt));
    vars.set("POST_SLUG", escape::html(&post.slug));
    vars.set("POST_CONTENT", markup::to_html(&post.content));
    vars.set("POST_TAGS", theme::tag_badges(style, &post.tags));
    vars.set("POST_TAGS_RAW", escape::html(&post.tags.join(",")));
    vars.set("BLOG_TITLE", escape::html(&blog.title));
    vars.set("BLOG_EMOJI", escape::html(&blog.planet.emoji));
    vars.set("BLOG_SLUG", escape::html(&blog.slug));
    vars.set("PREV_POST", theme::nav_card(style, &blog.slug, Nav::Prev, prev));
    vars.set("NEXT_POST", theme::nav_card(style, &blog.slug, Nav::Next, next));
    vars
}

/// One home-page table row per blog, in configuration order. A blog whose
/// newest post is strictly after the cutoff date gets an "updated" badge.
fn blog_table_rows(site: &[(&Blog, Vec<Post>)], cutoff: &str) -> String {
    let mut html = String::new();
    for (blog, posts) in site {
        // The badge comparison runs on the raw date; only the cell text is
        // escaped.
        let latest = posts.first().map(|post| post.date.as_str()).unwrap_or("");
        let badge = if !latest.is_empty() && latest > cutoff {
            r#" <span class="updated-badge">updated</span>"#
        } else {
            ""
        };
        html.push_str(&format!(
            "<tr>\n  <td>{emoji}</td>\n  <td><a href=\"/blogs/{slug}/\">{title}</a></td>\n  <td>{ja} / {en}</td>\n  <td>{author}</td>\n  <td>{count}</td>\n  <td>{latest}{badge}</td>\n</tr>\n",
            emoji = escape::html(&blog.planet.emoji),
            slug = escape::html(&blog.slug),
            title = escape::html(&blog.title),
            ja = escape::html(&blog.planet.name_ja),
            en = escape::html(&blog.planet.name),
            author = escape::html(&blog.author),
            count = posts.len(),
            latest = escape::html(latest),
            badge = badge,
        ));
    }
    html
}

fn latest_posts(entries: &[(&Blog, &Post)]) -> String {
    let mut html = String::new();
    for (blog, post) in entries {
        html.push_str(&format!(
            "<li class=\"latest-post\">\n  <a href=\"/blogs/{slug}/posts/{post_slug}.html\">{emoji} {title}</a>\n  <span class=\"latest-post-meta\">{date} · {blog_title}</span>\n</li>\n",
            slug = escape::html(&blog.slug),
            post_slug = escape::html(&post.slug),
            emoji = escape::html(&blog.planet.emoji),
            title = escape::html(&post.title),
            date = escape::html(&post.date),
            blog_title = escape::html(&blog.title),
        ));
    }
    html
}

/// The newest date a post may have without counting as a recent update.
/// Dates are compared as `YYYY-MM-DD` strings, which orders the same way the
/// dates themselves do.
fn cutoff_date(today: NaiveDate) -> String {
    (today - Duration::days(7)).format("%Y-%m-%d").to_string()
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| Error::MissingTemplate {
        path: path.to_owned(),
        err,
    })
}

/// Copies the static assets tree into the output. A project without a static
/// directory is fine; the step is skipped.
fn copy_static(src: &Path, dst: &Path) -> Result<()> {
    if !src.is_dir() {
        console::status("static", &format!("no {}, skipped", src.display()));
        return Ok(());
    }
    for entry in WalkDir::new(src) {
        let entry = entry?;
        if let Ok(rel) = entry.path().strip_prefix(src) {
            let target = dst.join(rel);
            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target)?;
            } else {
                std::fs::copy(entry.path(), &target)?;
            }
        }
    }
    console::status("static", &format!("copied {}", src.display()));
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during post loading,
/// template reading, cleaning the output directory, writing the feed, and
/// other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors while loading a blog's posts.
    Post(PostError),

    /// Returned when a referenced template file cannot be read.
    MissingTemplate { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Post(err) => err.fmt(f),
            Error::MissingTemplate { path, err } => {
                write!(f, "Reading template file `{}`: {}", path.display(), err)
            }
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory `{}`: {}", path.display(), err)
            }
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Post(err) => Some(err),
            Error::MissingTemplate { path: _, err } => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<PostError> for Error {
    /// Converts [`PostError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: PostError) -> Error {
        Error::Post(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts [`walkdir::Error`]s into [`Error`] by way of their underlying
    /// I/O errors.
    fn from(err: walkdir::Error) -> Error {
        Error::Io(err.into())
    }
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Planet;
    use crate::frontmatter::YamlFrontmatter;
    use std::fs;

    const LIST_TEMPLATE: &str = "<h1>{{BLOG_EMOJI}} {{BLOG_TITLE}}</h1>\n\
         <p>{{BLOG_DESC}} by {{BLOG_AUTHOR}}</p>\n\
         <p>{{PLANET_JA}} / {{PLANET_EN}} / {{POST_COUNT}} posts / {{LATEST_DATE}}</p>\n\
         {{TAG_FILTER}}\n{{POST_LIST}}\n";

    const POST_TEMPLATE: &str = "<h1>{{POST_TITLE}}</h1>\n\
         <p>{{POST_DATE}} {{POST_AUTHOR}}</p>\n\
         <article data-tags=\"{{POST_TAGS_RAW}}\">\n{{POST_CONTENT}}</article>\n\
         {{POST_TAGS}}\n{{PREV_POST}}\n{{NEXT_POST}}\n\
         <a href=\"/blogs/{{BLOG_SLUG}}/\">{{BLOG_EMOJI}} {{BLOG_TITLE}}</a>\n";

    const HOME_TEMPLATE: &str = "<h1>{{SITE_TITLE}}</h1>\n\
         <p>built {{BUILD_DATE}}: {{TOTAL_BLOGS}} blogs, {{TOTAL_POSTS}} posts, latest {{LATEST_DATE}}</p>\n\
         <table>{{BLOG_TABLE_ROWS}}</table>\n<ul>{{LATEST_POSTS}}</ul>\n";

    fn blog(slug: &str, theme: &str) -> Blog {
        Blog {
            slug: slug.to_owned(),
            title: format!("The {} Report", slug),
            desc: "notes from orbit".to_owned(),
            author: "ada".to_owned(),
            theme: theme.to_owned(),
            planet: Planet {
                emoji: "🪐".to_owned(),
                name_ja: "川".to_owned(),
                name: "River".to_owned(),
            },
        }
    }

    fn write_templates(paths: &Paths) {
        fs::create_dir_all(paths.templates.join("default")).unwrap();
        fs::write(
            paths.templates.join("default").join("blog-list.html"),
            LIST_TEMPLATE,
        )
        .unwrap();
        fs::write(paths.templates.join("default").join("post.html"), POST_TEMPLATE).unwrap();
        fs::write(paths.templates.join("home.html"), HOME_TEMPLATE).unwrap();
        fs::write(paths.templates.join("404.html"), "<h1>lost</h1>\n").unwrap();
    }

    fn write_post(paths: &Paths, blog: &str, slug: &str, title: &str, date: &str) {
        let dir = paths.content.join(blog);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(format!("{}.md", slug)),
            format!(
                "---\ntitle: {}\ndate: {}\nauthor: ada\ntags:\n  - rust\n---\n# Hello\n\nbody text\n",
                title, date
            ),
        )
        .unwrap();
    }

    #[test]
    fn test_build_writes_full_site_tree() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::new(dir.path(), dir.path().join("dist"));
        write_templates(&paths);
        write_post(&paths, "kawa", "first", "First Light", "2024-05-01");
        write_post(&paths, "kawa", "second", "Second Wind", "2024-06-01");
        fs::create_dir_all(paths.static_dir.join("css")).unwrap();
        fs::write(paths.static_dir.join("css").join("site.css"), "body{}").unwrap();

        let blogs = vec![blog("kawa", "")];
        build_site(&paths, &blogs, "https://example.org", &YamlFrontmatter).unwrap();

        let list = fs::read_to_string(paths.output.join("blogs/kawa/index.html")).unwrap();
        assert!(list.contains("The kawa Report"));
        assert!(list.contains("2 posts"));
        assert!(list.contains("First Light"));
        assert!(list.contains("data-tag-btn=\"rust\""));

        let post_page = fs::read_to_string(paths.output.join("blogs/kawa/posts/first.html")).unwrap();
        assert!(post_page.contains("<h1>First Light</h1>"));
        assert!(post_page.contains("<h1>Hello</h1>"));
        assert!(post_page.contains("<p>body text</p>"));
        assert!(post_page.contains("data-tags=\"rust\""));
        // first is the older post, so its "next" neighbor is second
        assert!(post_page.contains("/blogs/kawa/posts/second.html"));
        assert!(post_page.contains("nav-card-empty"));

        let home = fs::read_to_string(paths.output.join("index.html")).unwrap();
        assert!(home.contains("Planet Blogs"));
        assert!(home.contains("1 blogs, 2 posts, latest 2024-06-01"));
        assert!(home.contains("Second Wind"));

        assert_eq!(
            fs::read_to_string(paths.output.join("404.html")).unwrap(),
            "<h1>lost</h1>\n"
        );
        assert!(paths.output.join(".nojekyll").exists());

        let feed = fs::read_to_string(paths.output.join("feed.atom")).unwrap();
        assert!(feed.contains("Second Wind"));
        assert!(feed.contains("https://example.org/blogs/kawa/posts/second.html"));

        assert_eq!(
            fs::read_to_string(paths.output.join("static/css/site.css")).unwrap(),
            "body{}"
        );
    }

    #[test]
    fn test_rebuild_replaces_stale_output() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::new(dir.path(), dir.path().join("dist"));
        write_templates(&paths);
        write_post(&paths, "kawa", "first", "First Light", "2024-05-01");

        let blogs = vec![blog("kawa", "")];
        build_site(&paths, &blogs, "https://example.org", &YamlFrontmatter).unwrap();
        fs::write(paths.output.join("stale.html"), "old").unwrap();
        build_site(&paths, &blogs, "https://example.org", &YamlFrontmatter).unwrap();
        assert!(!paths.output.join("stale.html").exists());
        assert!(paths.output.join("blogs/kawa/index.html").exists());
    }

    #[test]
    fn test_missing_template_aborts_build() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::new(dir.path(), dir.path().join("dist"));
        write_post(&paths, "kawa", "first", "First Light", "2024-05-01");

        let blogs = vec![blog("kawa", "")];
        let err = build_site(&paths, &blogs, "https://example.org", &YamlFrontmatter).unwrap_err();
        match err {
            Error::MissingTemplate { path, err: _ } => {
                assert!(path.ends_with("default/blog-list.html"));
            }
            other => panic!("expected MissingTemplate, got {}", other),
        }
    }

    #[test]
    fn test_blog_without_content_renders_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::new(dir.path(), dir.path().join("dist"));
        write_templates(&paths);

        let blogs = vec![blog("quiet", "")];
        build_site(&paths, &blogs, "https://example.org", &YamlFrontmatter).unwrap();

        let list = fs::read_to_string(paths.output.join("blogs/quiet/index.html")).unwrap();
        assert!(list.contains("0 posts"));
        assert!(list.contains("No posts yet."));
        assert!(!paths.output.join("static").exists());
    }

    #[test]
    fn test_home_breaks_date_ties_by_blog_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::new(dir.path(), dir.path().join("dist"));
        write_templates(&paths);
        write_post(&paths, "alpha", "a", "Alpha Post", "2024-05-01");
        write_post(&paths, "beta", "b", "Beta Post", "2024-05-01");

        let blogs = vec![blog("alpha", ""), blog("beta", "")];
        build_site(&paths, &blogs, "https://example.org", &YamlFrontmatter).unwrap();

        let home = fs::read_to_string(paths.output.join("index.html")).unwrap();
        let alpha = home.find("Alpha Post").unwrap();
        let beta = home.find("Beta Post").unwrap();
        assert!(alpha < beta);
    }

    #[test]
    fn test_markup_in_a_date_is_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::new(dir.path(), dir.path().join("dist"));
        write_templates(&paths);
        // Dates are unvalidated text; one carrying markup must come out
        // inert on every page that prints it.
        write_post(&paths, "kawa", "odd", "Odd Date", "<img x=\"y");

        let blogs = vec![blog("kawa", "")];
        build_site(&paths, &blogs, "https://example.org", &YamlFrontmatter).unwrap();

        let home = fs::read_to_string(paths.output.join("index.html")).unwrap();
        assert!(!home.contains("<img"), "{}", home);
        assert!(home.contains("&lt;img x=&quot;y"));

        let list = fs::read_to_string(paths.output.join("blogs/kawa/index.html")).unwrap();
        assert!(!list.contains("<img"), "{}", list);
        assert!(list.contains("&lt;img x=&quot;y"));
    }

    #[test]
    fn test_cutoff_is_seven_days_back() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let cutoff = cutoff_date(today);
        assert_eq!(cutoff, "2024-05-03");
        assert!("2024-05-04" > cutoff.as_str());
        assert!(!("2024-05-03" > cutoff.as_str()));
        assert!(!("2024-05-02" > cutoff.as_str()));
    }

    #[test]
    fn test_blog_table_rows_flag_recent_updates() {
        let recent = blog("fresh", "");
        let dormant = blog("dusty", "");
        let newer = Post {
            slug: "n".to_owned(),
            title: "New".to_owned(),
            date: "2024-05-09".to_owned(),
            author: "ada".to_owned(),
            excerpt: String::new(),
            tags: Vec::new(),
            content: String::new(),
        };
        let older = Post {
            slug: "o".to_owned(),
            title: "Old".to_owned(),
            date: "2024-04-01".to_owned(),
            author: "ada".to_owned(),
            excerpt: String::new(),
            tags: Vec::new(),
            content: String::new(),
        };
        let site = vec![(&recent, vec![newer]), (&dormant, vec![older])];
        let rows = blog_table_rows(&site, "2024-05-03");
        assert_eq!(rows.matches("updated-badge").count(), 1);
        // the single badge sits in fresh's row, before dusty's row starts
        let badge = rows.find("updated-badge").unwrap();
        let dusty = rows.find("dusty").unwrap();
        assert!(badge < dusty);
    }
}
