//! HTML-escaping for user-sourced text. Every title, excerpt, author, tag,
//! slug, and date passes through [`html`] exactly once before it is
//! interpolated into a fragment or template, so content files can't smuggle
//! markup into the generated pages.

/// Escapes the five HTML-sensitive characters. The ampersand is handled by
/// the same single pass as the rest, so an `&` belonging to the input is
/// never re-escaped into `&amp;amp;` -- but note that escaping is *not*
/// idempotent: calling this twice on the same string double-encodes it.
/// Callers must escape each value exactly once.
pub fn html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
