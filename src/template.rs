//! Placeholder substitution for page templates. Templates are plain HTML
//! containing uppercase `{{NAME}}` tokens; [`render`] replaces each token
//! with its mapped value in a single left-to-right pass. There are no
//! conditionals and no loops -- repeated structure (post lists, table rows)
//! arrives pre-rendered as a single value from the fragment builders.

use std::collections::HashMap;

/// The name-to-value mapping consumed by [`render`]. Values are final
/// strings; anything needing escaping was escaped before it was set.
#[derive(Default)]
pub struct Vars(HashMap<&'static str, String>);

impl Vars {
    pub fn new() -> Vars {
        Vars::default()
    }

    /// Maps `name` to `value`.
    pub fn set(&mut self, name: &'static str, value: impl Into<String>) {
        self.0.insert(name, value.into());
    }

    /// Maps `name` to `value`, or to the empty string when `value` is
    /// `None`. This is how "absent" renders as nothing while a real `0`
    /// still renders as `0`.
    pub fn set_opt(&mut self, name: &'static str, value: Option<String>) {
        self.0.insert(name, value.unwrap_or_default());
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// Replaces every literal `{{NAME}}` occurrence in `template` with the
/// mapped value. Names are matched exactly: case-sensitive, no whitespace
/// tolerance inside the braces (`{{ NAME }}` is a different, presumably
/// unmapped, token). Placeholders without a mapping are left untouched, and
/// substituted text is never re-scanned, so no replacement order across keys
/// can change the result. A `{{` without a closing `}}` passes through
/// literally.
pub fn render(template: &str, vars: &Vars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
            Some(end) => {
                match vars.get(&after[..end]) {
                    Some(value) => out.push_str(value),
                    // Unknown token: emit it verbatim, braces included.
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
        }
    }
    out.push_str(rest);
    out
}
