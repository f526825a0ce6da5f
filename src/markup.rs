//! Converts post bodies to HTML. The body format is deliberately small and
//! line-oriented: every line is atomic, and only block-level structure
//! exists. Per line, in priority order:
//!
//! 1. `### `, `## `, `# ` prefixes produce `<h3>`/`<h2>`/`<h1>`.
//! 2. Digits followed by `.` and one whitespace character produce an ordered
//!    list item (the numeric prefix is stripped).
//! 3. A `- ` prefix produces an unordered list item.
//! 4. An empty or whitespace-only line is a paragraph separator.
//! 5. Anything else is a single-line paragraph.
//!
//! At most one list is open at a time; a line of the other list kind (or any
//! non-item line) closes it first, and end of input closes whatever is still
//! open, so emitted list tags always balance. There is no inline syntax --
//! no emphasis, no links -- which keeps the grammar unambiguous and lets all
//! inline text go through [`crate::escape::html`] untouched.

use crate::escape;

/// Renders a post body into an HTML string.
pub fn to_html(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + body.len() / 4);
    let mut renderer = Renderer::default();
    for line in body.lines() {
        renderer.line(&mut out, line);
    }
    renderer.finish(&mut out);
    out
}

/// The list element currently open, if any. Ordered and unordered lists are
/// mutually exclusive.
#[derive(Clone, Copy, PartialEq, Eq)]
enum List {
    Ordered,
    Unordered,
}

/// Tracks open-list state while lines are emitted. Modeled as a tiny
/// renderer struct so the close-before-open rules live in one place.
#[derive(Default)]
struct Renderer {
    open: Option<List>,
}

impl Renderer {
    fn line(&mut self, out: &mut String, line: &str) {
        if let Some(text) = line.strip_prefix("### ") {
            self.heading(out, 3, text);
        } else if let Some(text) = line.strip_prefix("## ") {
            self.heading(out, 2, text);
        } else if let Some(text) = line.strip_prefix("# ") {
            self.heading(out, 1, text);
        } else if let Some(text) = ordered_item(line) {
            if self.open != Some(List::Ordered) {
                self.close_list(out);
                out.push_str("<ol>\n");
                self.open = Some(List::Ordered);
            }
            self.item(out, text);
        } else if let Some(text) = line.strip_prefix("- ") {
            if self.open != Some(List::Unordered) {
                self.close_list(out);
                out.push_str("<ul>\n");
                self.open = Some(List::Unordered);
            }
            self.item(out, text);
        } else if line.trim().is_empty() {
            self.close_list(out);
            out.push('\n');
        } else {
            self.close_list(out);
            out.push_str("<p>");
            out.push_str(&escape::html(line));
            out.push_str("</p>\n");
        }
    }

    fn heading(&mut self, out: &mut String, level: u8, text: &str) {
        self.close_list(out);
        out.push_str(&format!("<h{}>{}</h{}>\n", level, escape::html(text), level));
    }

    fn item(&mut self, out: &mut String, text: &str) {
        out.push_str("  <li>");
        out.push_str(&escape::html(text));
        out.push_str("</li>\n");
    }

    /// Emits the close tag for whichever list is open. Every code path that
    /// leaves list context goes through here, which is what keeps open and
    /// close tags balanced.
    fn close_list(&mut self, out: &mut String) {
        match self.open.take() {
            Some(List::Ordered) => out.push_str("</ol>\n"),
            Some(List::Unordered) => out.push_str("</ul>\n"),
            None => {}
        }
    }

    fn finish(&mut self, out: &mut String) {
        self.close_list(out);
    }
}

/// Matches lines that begin an ordered-list item: one or more ASCII digits,
/// a literal `.`, and exactly one whitespace character. Returns the text
/// after that whitespace, so `12.  x` keeps its second space.
fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => Some(chars.as_str()),
        _ => None,
    }
}
