use std::sync::LazyLock;

use regex::Regex;

static HEADING_MARK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#+\s").unwrap());
static LEADING_HASHES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+\s*").unwrap());
static NEWLINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());

pub const EXCERPT_LEN: usize = 150;
pub const EMPTY_EXCERPT: &str = "No content available...";
pub const UNTITLED: &str = "Untitled";

/// Strip markdown headings and emphasis, fold newlines into spaces.
pub fn plain_text(text: &str) -> String {
    let text = HEADING_MARK_RE.replace_all(text, "");
    let text = strip_emphasis(&text);
    NEWLINES_RE.replace_all(&text, " ").trim().to_string()
}

/// Removes `**` then any remaining `*`.
pub fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace('*', "")
}

/// Plain-text excerpt, truncated to 150 chars plus an ellipsis.
pub fn excerpt(content: &str) -> String {
    let plain = plain_text(content);
    if plain.is_empty() {
        return EMPTY_EXCERPT.to_string();
    }
    if plain.chars().count() > EXCERPT_LEN {
        let head: String = plain.chars().take(EXCERPT_LEN).collect();
        format!("{}...", head)
    } else {
        plain
    }
}

/// Removes a leading run of `#` and the whitespace after it.
pub fn strip_leading_hashes(text: &str) -> String {
    LEADING_HASHES_RE.replace(text, "").into_owned()
}

pub fn clean_title(topic: Option<&str>) -> String {
    let topic = topic.filter(|t| !t.is_empty()).unwrap_or(UNTITLED);
    strip_leading_hashes(topic).trim().to_string()
}
