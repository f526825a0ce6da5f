//! Colored status lines for the command-line build.

use colored::{ColoredString, Colorize};

/// Prints one build status line as `[module] message`.
pub fn status(module: &str, message: &str) {
    println!("{} {}", prefix(module), message);
}

/// Prints a fatal error line to stderr before the process exits nonzero.
pub fn failure(message: &str) {
    eprintln!("{} {}", "[error]".bright_red().bold(), message);
}

fn prefix(module: &str) -> ColoredString {
    let prefix = format!("[{}]", module);
    match module {
        "done" => prefix.bright_green().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}
