//! Theme dispatch and the HTML fragment builders shared by every theme.
//!
//! A [`Theme`] is a dispatch key, not behavior. Parsing is total: identifiers
//! that match no known theme select [`Theme::Default`], so a typo in
//! `blogs.json` degrades the look of one blog without failing the build. Each
//! variant maps to one `static` [`Style`] record of class names and glyphs,
//! and the builder functions below are parameterized by `&Style`, so every
//! theme renders the same data fields (title, date, author, excerpt, tags,
//! slug-based links) and differs only in decoration.

use crate::escape;
use crate::post::Post;

/// The filter button value that matches every card client-side.
const SHOW_ALL: &str = "*";

/// Identifies one of the site's visual variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Default,
    Midnight,
    Retro,
    Sakura,
    Terminal,
    Ocean,
    Forest,
    Pop,
    Paper,
    Neon,
    Zen,
}

impl Theme {
    /// Maps a configured identifier onto a variant. Unknown or empty values
    /// fall back to [`Theme::Default`]; this never fails.
    pub fn parse(name: &str) -> Theme {
        match name {
            "midnight" => Theme::Midnight,
            "retro" => Theme::Retro,
            "sakura" => Theme::Sakura,
            "terminal" => Theme::Terminal,
            "ocean" => Theme::Ocean,
            "forest" => Theme::Forest,
            "pop" => Theme::Pop,
            "paper" => Theme::Paper,
            "neon" => Theme::Neon,
            "zen" => Theme::Zen,
            _ => Theme::Default,
        }
    }

    /// The subdirectory under `templates/` holding this theme's `blog-list`
    /// and `post` templates.
    pub fn dir(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Midnight => "midnight",
            Theme::Retro => "retro",
            Theme::Sakura => "sakura",
            Theme::Terminal => "terminal",
            Theme::Ocean => "ocean",
            Theme::Forest => "forest",
            Theme::Pop => "pop",
            Theme::Paper => "paper",
            Theme::Neon => "neon",
            Theme::Zen => "zen",
        }
    }

    /// The decoration record for this theme.
    pub fn style(self) -> &'static Style {
        match self {
            Theme::Default => &DEFAULT,
            Theme::Midnight => &MIDNIGHT,
            Theme::Retro => &RETRO,
            Theme::Sakura => &SAKURA,
            Theme::Terminal => &TERMINAL,
            Theme::Ocean => &OCEAN,
            Theme::Forest => &FOREST,
            Theme::Pop => &POP,
            Theme::Paper => &PAPER,
            Theme::Neon => &NEON,
            Theme::Zen => &ZEN,
        }
    }
}

/// Which neighbor a navigation card points at. Posts are ordered newest
/// first, so "previous" is the older post and "next" the newer one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nav {
    Prev,
    Next,
}

impl Nav {
    fn label(self) -> &'static str {
        match self {
            Nav::Prev => "previous",
            Nav::Next => "next",
        }
    }
}

/// Per-theme decoration: CSS class names, separator and glyph strings, and
/// button labels. The builders never branch on the theme itself, so adding a
/// theme means adding one record here and one template directory.
pub struct Style {
    pub card: &'static str,
    pub card_title: &'static str,
    pub card_meta: &'static str,
    pub card_excerpt: &'static str,
    pub empty: &'static str,
    pub empty_message: &'static str,
    pub filter: &'static str,
    pub button: &'static str,
    /// Marks the active filter button; toggled client-side.
    pub active: &'static str,
    pub badge: &'static str,
    pub nav: &'static str,
    pub nav_empty: &'static str,
    pub nav_label: &'static str,
    pub meta_sep: &'static str,
    pub tag_glyph: &'static str,
    pub prev_glyph: &'static str,
    pub next_glyph: &'static str,
    pub all_label: &'static str,
}

static DEFAULT: Style = Style {
    card: "post-card",
    card_title: "post-card-title",
    card_meta: "post-card-meta",
    card_excerpt: "post-card-excerpt",
    empty: "post-list-empty",
    empty_message: "No posts yet.",
    filter: "tag-filter",
    button: "tag-btn",
    active: "tag-btn-active",
    badge: "tag-badge",
    nav: "nav-card",
    nav_empty: "nav-card-empty",
    nav_label: "nav-card-label",
    meta_sep: "·",
    tag_glyph: "#",
    prev_glyph: "←",
    next_glyph: "→",
    all_label: "All",
};

static MIDNIGHT: Style = Style {
    card: "mn-card",
    card_title: "mn-card-title",
    card_meta: "mn-card-meta",
    card_excerpt: "mn-card-excerpt",
    empty: "mn-empty",
    empty_message: "No posts yet.",
    filter: "mn-filter",
    button: "mn-btn",
    active: "mn-btn-lit",
    badge: "mn-badge",
    nav: "mn-nav",
    nav_empty: "mn-nav-empty",
    nav_label: "mn-nav-label",
    meta_sep: "·",
    tag_glyph: "✦",
    prev_glyph: "←",
    next_glyph: "→",
    all_label: "All",
};

static RETRO: Style = Style {
    card: "retro-card",
    card_title: "retro-card-title",
    card_meta: "retro-card-meta",
    card_excerpt: "retro-card-excerpt",
    empty: "retro-empty",
    empty_message: "*** no posts yet ***",
    filter: "retro-filter",
    button: "retro-btn",
    active: "retro-btn-on",
    badge: "retro-badge",
    nav: "retro-nav",
    nav_empty: "retro-nav-empty",
    nav_label: "retro-nav-label",
    meta_sep: "//",
    tag_glyph: "★",
    prev_glyph: "«",
    next_glyph: "»",
    all_label: "ALL",
};

static SAKURA: Style = Style {
    card: "sakura-card",
    card_title: "sakura-card-title",
    card_meta: "sakura-card-meta",
    card_excerpt: "sakura-card-excerpt",
    empty: "sakura-empty",
    empty_message: "No posts yet.",
    filter: "sakura-filter",
    button: "sakura-btn",
    active: "sakura-btn-bloom",
    badge: "sakura-badge",
    nav: "sakura-nav",
    nav_empty: "sakura-nav-empty",
    nav_label: "sakura-nav-label",
    meta_sep: "・",
    tag_glyph: "✿",
    prev_glyph: "←",
    next_glyph: "→",
    all_label: "すべて",
};

static TERMINAL: Style = Style {
    card: "term-card",
    card_title: "term-card-title",
    card_meta: "term-card-meta",
    card_excerpt: "term-card-excerpt",
    empty: "term-empty",
    empty_message: "no posts yet",
    filter: "term-filter",
    button: "term-btn",
    active: "term-btn-on",
    badge: "term-badge",
    nav: "term-nav",
    nav_empty: "term-nav-empty",
    nav_label: "term-nav-label",
    meta_sep: "::",
    tag_glyph: "#",
    prev_glyph: "‹",
    next_glyph: "›",
    all_label: "*",
};

static OCEAN: Style = Style {
    card: "ocean-card",
    card_title: "ocean-card-title",
    card_meta: "ocean-card-meta",
    card_excerpt: "ocean-card-excerpt",
    empty: "ocean-empty",
    empty_message: "No posts yet.",
    filter: "ocean-filter",
    button: "ocean-btn",
    active: "ocean-btn-crest",
    badge: "ocean-badge",
    nav: "ocean-nav",
    nav_empty: "ocean-nav-empty",
    nav_label: "ocean-nav-label",
    meta_sep: "·",
    tag_glyph: "≈",
    prev_glyph: "←",
    next_glyph: "→",
    all_label: "All",
};

static FOREST: Style = Style {
    card: "forest-card",
    card_title: "forest-card-title",
    card_meta: "forest-card-meta",
    card_excerpt: "forest-card-excerpt",
    empty: "forest-empty",
    empty_message: "No posts yet.",
    filter: "forest-filter",
    button: "forest-btn",
    active: "forest-btn-lit",
    badge: "forest-badge",
    nav: "forest-nav",
    nav_empty: "forest-nav-empty",
    nav_label: "forest-nav-label",
    meta_sep: "·",
    tag_glyph: "❧",
    prev_glyph: "←",
    next_glyph: "→",
    all_label: "All",
};

static POP: Style = Style {
    card: "pop-card",
    card_title: "pop-card-title",
    card_meta: "pop-card-meta",
    card_excerpt: "pop-card-excerpt",
    empty: "pop-empty",
    empty_message: "No posts yet!",
    filter: "pop-filter",
    button: "pop-btn",
    active: "pop-btn-now",
    badge: "pop-badge",
    nav: "pop-nav",
    nav_empty: "pop-nav-empty",
    nav_label: "pop-nav-label",
    meta_sep: "★",
    tag_glyph: "!",
    prev_glyph: "«",
    next_glyph: "»",
    all_label: "ALL!",
};

static PAPER: Style = Style {
    card: "paper-card",
    card_title: "paper-card-title",
    card_meta: "paper-card-meta",
    card_excerpt: "paper-card-excerpt",
    empty: "paper-empty",
    empty_message: "No posts yet.",
    filter: "paper-filter",
    button: "paper-btn",
    active: "paper-btn-ink",
    badge: "paper-badge",
    nav: "paper-nav",
    nav_empty: "paper-nav-empty",
    nav_label: "paper-nav-label",
    meta_sep: "·",
    tag_glyph: "§",
    prev_glyph: "←",
    next_glyph: "→",
    all_label: "All",
};

static NEON: Style = Style {
    card: "neon-card",
    card_title: "neon-card-title",
    card_meta: "neon-card-meta",
    card_excerpt: "neon-card-excerpt",
    empty: "neon-empty",
    empty_message: "No posts yet.",
    filter: "neon-filter",
    button: "neon-btn",
    active: "neon-btn-glow",
    badge: "neon-badge",
    nav: "neon-nav",
    nav_empty: "neon-nav-empty",
    nav_label: "neon-nav-label",
    meta_sep: "/",
    tag_glyph: "◆",
    prev_glyph: "«",
    next_glyph: "»",
    all_label: "ALL",
};

static ZEN: Style = Style {
    card: "zen-card",
    card_title: "zen-card-title",
    card_meta: "zen-card-meta",
    card_excerpt: "zen-card-excerpt",
    empty: "zen-empty",
    empty_message: "Nothing here yet.",
    filter: "zen-filter",
    button: "zen-btn",
    active: "zen-btn-here",
    badge: "zen-badge",
    nav: "zen-nav",
    nav_empty: "zen-nav-empty",
    nav_label: "zen-nav-label",
    meta_sep: "·",
    tag_glyph: "○",
    prev_glyph: "←",
    next_glyph: "→",
    all_label: "All",
};

fn post_url(blog_slug: &str, post_slug: &str) -> String {
    // Slugs are user-sourced text like any other; escaped before they land
    // in an href attribute.
    format!(
        "/blogs/{}/posts/{}.html",
        escape::html(blog_slug),
        escape::html(post_slug)
    )
}

/// Renders one link-wrapped card per post, or the theme's empty-state
/// placeholder when there are no posts. Each card carries the post's tags,
/// comma-joined and escaped, in a `data-post-tags` attribute so the filter
/// buttons can match against it client-side.
pub fn post_list(style: &Style, blog_slug: &str, posts: &[Post]) -> String {
    if posts.is_empty() {
        return format!(r#"<p class="{}">{}</p>"#, style.empty, style.empty_message);
    }
    let mut html = String::new();
    for post in posts {
        html.push_str(&format!(
            r#"<a class="{card}" href="{url}" data-post-tags="{tags}">
  <h3 class="{title_class}">{title}</h3>
  <p class="{meta}">{date} {sep} {author}</p>
  <p class="{excerpt_class}">{excerpt}</p>
  {badges}
</a>
"#,
            card = style.card,
            url = post_url(blog_slug, &post.slug),
            tags = escape::html(&post.tags.join(",")),
            title_class = style.card_title,
            title = escape::html(&post.title),
            meta = style.card_meta,
            date = escape::html(&post.date),
            sep = style.meta_sep,
            author = escape::html(&post.author),
            excerpt_class = style.card_excerpt,
            excerpt = escape::html(&post.excerpt),
            badges = tag_badges(style, &post.tags),
        ));
    }
    html
}

/// Renders the tag filter panel: one show-all button (initially active)
/// followed by one button per distinct tag, in the order tags first appear
/// across the post list. With no tags anywhere the panel collapses to an
/// empty string rather than a lone show-all button.
pub fn tag_filter(style: &Style, posts: &[Post]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for post in posts {
        for tag in &post.tags {
            if !seen.contains(&tag.as_str()) {
                seen.push(tag);
            }
        }
    }
    if seen.is_empty() {
        return String::new();
    }
    let mut html = format!(
        "<div class=\"{filter}\">\n  <button class=\"{button} {active}\" data-tag-btn=\"{all}\">{label}</button>\n",
        filter = style.filter,
        button = style.button,
        active = style.active,
        all = SHOW_ALL,
        label = style.all_label,
    );
    for tag in seen {
        let tag = escape::html(tag);
        html.push_str(&format!(
            "  <button class=\"{button}\" data-tag-btn=\"{tag}\">{glyph}{tag}</button>\n",
            button = style.button,
            glyph = style.tag_glyph,
            tag = tag,
        ));
    }
    html.push_str("</div>\n");
    html
}

/// Renders a link card for a neighboring post, or the theme's empty
/// placeholder element when there is no neighbor, so the two slots keep
/// their layout position either way.
pub fn nav_card(style: &Style, blog_slug: &str, nav: Nav, neighbor: Option<&Post>) -> String {
    let post = match neighbor {
        Some(post) => post,
        None => return format!(r#"<div class="{}"></div>"#, style.nav_empty),
    };
    let marker = match nav {
        Nav::Prev => format!("{} {}", style.prev_glyph, nav.label()),
        Nav::Next => format!("{} {}", nav.label(), style.next_glyph),
    };
    format!(
        r#"<a class="{nav}" href="{url}">
  <span class="{label_class}">{marker}</span>
  <span class="{title_class}">{title}</span>
  <span class="{meta}">{date}</span>
</a>
"#,
        nav = style.nav,
        url = post_url(blog_slug, &post.slug),
        label_class = style.nav_label,
        marker = marker,
        title_class = style.card_title,
        title = escape::html(&post.title),
        meta = style.card_meta,
        date = escape::html(&post.date),
    )
}

/// Renders one badge per tag, or an empty string for an untagged post.
pub fn tag_badges(style: &Style, tags: &[String]) -> String {
    let mut html = String::new();
    for tag in tags {
        html.push_str(&format!(
            r#"<span class="{badge}">{glyph}{tag}</span>"#,
            badge = style.badge,
            glyph = style.tag_glyph,
            tag = escape::html(tag),
        ));
    }
    html
}

#[cfg(test)]
mod test {
    use super::*;

    const ALL_THEMES: [Theme; 11] = [
        Theme::Default,
        Theme::Midnight,
        Theme::Retro,
        Theme::Sakura,
        Theme::Terminal,
        Theme::Ocean,
        Theme::Forest,
        Theme::Pop,
        Theme::Paper,
        Theme::Neon,
        Theme::Zen,
    ];

    fn post(slug: &str, title: &str, tags: &[&str]) -> Post {
        Post {
            slug: slug.to_owned(),
            title: title.to_owned(),
            date: "2024-05-01".to_owned(),
            author: "ada".to_owned(),
            excerpt: "first light".to_owned(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            content: String::new(),
        }
    }

    #[test]
    fn test_parse_known_identifiers() {
        assert_eq!(Theme::parse("midnight"), Theme::Midnight);
        assert_eq!(Theme::parse("zen"), Theme::Zen);
        assert_eq!(Theme::parse("default"), Theme::Default);
    }

    #[test]
    fn test_parse_falls_back_to_default() {
        assert_eq!(Theme::parse(""), Theme::Default);
        assert_eq!(Theme::parse("vaporwave"), Theme::Default);
        assert_eq!(Theme::parse("Midnight"), Theme::Default);
    }

    #[test]
    fn test_parse_and_dir_round_trip() {
        for theme in ALL_THEMES.iter() {
            assert_eq!(Theme::parse(theme.dir()), *theme);
        }
    }

    #[test]
    fn test_unknown_theme_renders_exactly_like_default() {
        let posts = vec![post("a", "Alpha", &["rust"])];
        let fallback = Theme::parse("not-a-theme").style();
        let default = Theme::Default.style();
        assert_eq!(
            post_list(fallback, "kawa", &posts),
            post_list(default, "kawa", &posts)
        );
        assert_eq!(tag_filter(fallback, &posts), tag_filter(default, &posts));
    }

    #[test]
    fn test_every_theme_renders_the_same_fields() {
        let posts = vec![post("a", "Alpha", &["rust", "notes"])];
        for theme in ALL_THEMES.iter() {
            let style = theme.style();
            let list = post_list(style, "kawa", &posts);
            assert!(list.contains("href=\"/blogs/kawa/posts/a.html\""));
            assert!(list.contains("data-post-tags=\"rust,notes\""));
            assert!(list.contains("Alpha"));
            assert!(list.contains("2024-05-01"));
            assert!(list.contains("ada"));
            assert!(list.contains("first light"));

            let filter = tag_filter(style, &posts);
            assert!(filter.contains("data-tag-btn=\"*\""));
            assert!(filter.contains("data-tag-btn=\"rust\""));
            assert!(filter.contains(style.active));

            let nav = nav_card(style, "kawa", Nav::Prev, Some(&posts[0]));
            assert!(nav.contains("previous"));
            assert!(nav.contains("Alpha"));
            assert!(nav.contains("href=\"/blogs/kawa/posts/a.html\""));
        }
    }

    #[test]
    fn test_post_list_empty_renders_placeholder() {
        let style = Theme::Default.style();
        let html = post_list(style, "kawa", &[]);
        assert!(html.contains(style.empty_message));
        assert!(!html.contains("<a"));
    }

    #[test]
    fn test_post_list_escapes_metadata_and_tags() {
        let posts = vec![post("a", "Q&A <live>", &["a&b"])];
        let html = post_list(Theme::Default.style(), "kawa", &posts);
        assert!(html.contains("Q&amp;A &lt;live&gt;"));
        assert!(html.contains("data-post-tags=\"a&amp;b\""));
        assert!(!html.contains("<live>"));
    }

    #[test]
    fn test_tag_filter_dedups_in_first_seen_order() {
        let posts = vec![
            post("a", "Alpha", &["beta", "alpha"]),
            post("b", "Beta", &["alpha", "gamma"]),
        ];
        let html = tag_filter(Theme::Default.style(), &posts);
        let all = html.find("data-tag-btn=\"*\"").unwrap();
        let beta = html.find("data-tag-btn=\"beta\"").unwrap();
        let alpha = html.find("data-tag-btn=\"alpha\"").unwrap();
        let gamma = html.find("data-tag-btn=\"gamma\"").unwrap();
        assert!(all < beta && beta < alpha && alpha < gamma);
        assert_eq!(html.matches("data-tag-btn=\"alpha\"").count(), 1);
    }

    #[test]
    fn test_tag_filter_show_all_is_initially_active() {
        let style = Theme::Neon.style();
        let html = tag_filter(style, &[post("a", "Alpha", &["rust"])]);
        let button = html.lines().find(|l| l.contains("data-tag-btn=\"*\"")).unwrap();
        assert!(button.contains(style.active));
        let tag_button = html
            .lines()
            .find(|l| l.contains("data-tag-btn=\"rust\""))
            .unwrap();
        assert!(!tag_button.contains(style.active));
    }

    #[test]
    fn test_tag_filter_without_tags_is_empty() {
        let posts = vec![post("a", "Alpha", &[])];
        assert_eq!(tag_filter(Theme::Default.style(), &posts), "");
        assert_eq!(tag_filter(Theme::Default.style(), &[]), "");
    }

    #[test]
    fn test_nav_card_absent_neighbor_is_placeholder() {
        let style = Theme::Default.style();
        let html = nav_card(style, "kawa", Nav::Next, None);
        assert!(html.contains(style.nav_empty));
        assert!(!html.contains("href"));
    }

    #[test]
    fn test_nav_card_directions_are_labeled() {
        let style = Theme::Default.style();
        let older = post("old", "Older", &[]);
        let newer = post("new", "Newer", &[]);
        let prev = nav_card(style, "kawa", Nav::Prev, Some(&older));
        let next = nav_card(style, "kawa", Nav::Next, Some(&newer));
        assert!(prev.contains("previous"));
        assert!(prev.contains("/blogs/kawa/posts/old.html"));
        assert!(next.contains("next"));
        assert!(next.contains("/blogs/kawa/posts/new.html"));
    }

    #[test]
    fn test_tag_badges_escape_and_empty() {
        let style = Theme::Default.style();
        assert_eq!(tag_badges(style, &[]), "");
        let html = tag_badges(style, &["c&c".to_owned()]);
        assert!(html.contains("c&amp;c"));
        assert!(html.contains(style.badge));
    }
}
