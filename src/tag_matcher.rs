/*!
 * Export tag detection.
 *
 * A note is selected when the export tag appears as a whole token: at the
 * start of the text or after whitespace, and at the end of the text or
 * before whitespace. The tag is matched literally and case-sensitively.
 */

use regex::Regex;

/// Compiled matcher for a single literal tag
#[derive(Debug, Clone)]
pub struct TagMatcher {
    tag: String,
    pattern: Regex,
}

impl TagMatcher {
    /// Build a matcher for `tag`; regex metacharacters in the tag are escaped
    pub fn new(tag: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(r"(?:^|\s){}(?:\s|$)", regex::escape(tag)))?;
        Ok(Self {
            tag: tag.to_string(),
            pattern,
        })
    }

    /// The literal tag this matcher looks for
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether `text` carries the tag as a whole token
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// One-shot form of [`TagMatcher::is_match`]
pub fn matches(tag: &str, text: &str) -> bool {
    TagMatcher::new(tag).is_ok_and(|matcher| matcher.is_match(text))
}
