use asterism::build;
use asterism::config::{self, Paths};
use asterism::console;
use asterism::frontmatter::YamlFrontmatter;
use clap::{App, Arg};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

const DEFAULT_BASE_URL: &str = "https://blogs.example.org";

fn main() {
    if let Err(err) = run() {
        console::failure(&format!("{:#}", err));
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let matches = App::new("asterism")
        .version(clap::crate_version!())
        .about("Builds a small planet of themed blogs into a static site")
        .arg(
            Arg::with_name("project")
                .help("Project root holding blogs.json, content/, templates/ and static/")
                .default_value("."),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("DIR")
                .help("Output directory (defaults to <project>/dist)"),
        )
        .arg(
            Arg::with_name("base-url")
                .long("base-url")
                .takes_value(true)
                .value_name("URL")
                .default_value(DEFAULT_BASE_URL)
                .help("Absolute URL prefix the Atom feed links under"),
        )
        .get_matches();

    let root = PathBuf::from(matches.value_of("project").unwrap_or("."));
    let output = matches
        .value_of("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| root.join("dist"));
    let base_url = matches
        .value_of("base-url")
        .unwrap_or(DEFAULT_BASE_URL)
        .trim_end_matches('/')
        .to_owned();

    let started = Instant::now();
    let paths = Paths::new(&root, output);
    let blogs = config::load_blogs(&paths.config_file)?;
    console::status(
        "config",
        &format!("{} blogs from {}", blogs.len(), paths.config_file.display()),
    );
    build::build_site(&paths, &blogs, &base_url, &YamlFrontmatter)?;
    console::status("done", &format!("site built in {:.2?}", started.elapsed()));
    Ok(())
}
