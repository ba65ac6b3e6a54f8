//! Lightweight text markup used by Font and IconCallout layers.
//!
//! Only three constructs exist: `**bold**`, `*italic*` and newlines. Everything else passes
//! through untouched; the render surface receives the result as ready-made inner markup.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));

static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("italic pattern is valid"));

/// Render `text` to inner HTML.
///
/// Bold is replaced before italic so `**x**` never turns into nested `<em>`. Neither span
/// crosses a line break.
pub fn render_markup(text: &str) -> String {
    let bold = BOLD.replace_all(text, "<strong>$1</strong>");
    let italic = ITALIC.replace_all(&bold, "<em>$1</em>");
    italic.replace('\n', "<br>")
}

/// Truncate `text` to at most `max_chars` characters (not bytes).
pub fn cap_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/markup.rs"]
mod tests;
