/*!
 * Highlight rewriting for card fields.
 *
 * Obsidian marks highlights as `==text==`. On the Text field those spans
 * become Anki cloze deletions, on the Translation field they become an HTML
 * element so the highlight survives the import.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Non-greedy `==...==` span on a single line
static HIGHLIGHT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"==(.+?)==").expect("Invalid highlight regex"));

pub const DEFAULT_CLOZE_NUMBER: u32 = 1;
pub const DEFAULT_HIGHLIGHT_TAG: &str = "mark";

/// Convert `==text==` to `{{c<N>::text}}`.
///
/// Every span gets the same cloze number; numbers are not incremented
/// within a call.
pub fn convert_to_cloze(text: &str, cloze_number: u32) -> String {
    HIGHLIGHT_REGEX
        .replace_all(text, |caps: &Captures| {
            format!("{{{{c{}::{}}}}}", cloze_number, &caps[1])
        })
        .into_owned()
}

/// Convert `==text==` to `<tag>text</tag>`
pub fn convert_highlight(text: &str, html_tag: &str) -> String {
    HIGHLIGHT_REGEX
        .replace_all(text, |caps: &Captures| {
            format!("<{tag}>{}</{tag}>", &caps[1], tag = html_tag)
        })
        .into_owned()
}

/// Configured pair of field rewrites
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTransformer {
    pub cloze_number: u32,
    pub highlight_tag: String,
}

impl Default for TextTransformer {
    fn default() -> Self {
        Self {
            cloze_number: DEFAULT_CLOZE_NUMBER,
            highlight_tag: DEFAULT_HIGHLIGHT_TAG.to_string(),
        }
    }
}

impl TextTransformer {
    pub fn new(cloze_number: u32, highlight_tag: impl Into<String>) -> Self {
        Self {
            cloze_number,
            highlight_tag: highlight_tag.into(),
        }
    }

    pub fn cloze(&self, text: &str) -> String {
        convert_to_cloze(text, self.cloze_number)
    }

    pub fn highlight(&self, text: &str) -> String {
        convert_highlight(text, &self.highlight_tag)
    }
}
