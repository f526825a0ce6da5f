//! The library code for the `asterism` static site generator. A build is one
//! single-threaded pass over a project:
//!
//! 1. Loading the blog collection from `blogs.json` ([`crate::config`]) and
//!    each blog's posts from its content directory ([`crate::post`]), with
//!    frontmatter split off by an injected parser ([`crate::frontmatter`]).
//! 2. Rendering pages ([`crate::build`]): post bodies go through the block
//!    markup renderer ([`crate::markup`]), the theme fragment builders
//!    ([`crate::theme`]) produce post cards, tag filters, and prev/next
//!    navigation, and everything is substituted into HTML templates
//!    ([`crate::template`]) and written into the output tree, together with
//!    the aggregated home page, the Atom feed ([`crate::feed`]), and a copy
//!    of the static assets.
//!
//! All text destined for HTML goes through [`crate::escape`] exactly once,
//! at the point it is embedded.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod console;
pub mod escape;
pub mod feed;
pub mod frontmatter;
pub mod markup;
pub mod post;
pub mod template;
pub mod theme;
