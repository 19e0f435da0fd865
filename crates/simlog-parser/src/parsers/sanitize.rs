//! Markup escaping and session identifier redaction for reported text.

use regex::Regex;
use std::sync::LazyLock;

static RE_SESSION_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:SessionId|sessionID|sessionId|SessionID)=(.*?&|.*)").unwrap()
});

/// Replacements applied by [`escape_markup`], in order.
const ESCAPES: [(&str, &str); 5] = [
    ("\"", "&quot;"),
    ("\\", "&#92;"),
    ("/", "&#47;"),
    ("<", "&lt;"),
    (">", "&gt;"),
];

/// Entity and percent forms recognised by [`unescape_markup`], decoded in order.
const UNESCAPES: [(&str, &str); 11] = [
    ("&#39;", "'"),
    ("&#47;", "/"),
    ("&quot;", "\""),
    ("&#92;", "\\"),
    ("%3A", ":"),
    ("%2F", "/"),
    ("%2E", "."),
    ("&gt;", ">"),
    ("%7C", "|"),
    ("&lt;", "<"),
    ("&amp;", "&"),
];

/// Escape characters that would break downstream markup.
pub fn escape_markup(text: &str) -> String {
    ESCAPES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Decode escaped text for display.
pub fn unescape_markup(text: &str) -> String {
    UNESCAPES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Replace the session identifier value (through the next `&`, or to the
/// end) with `placeholder`. Every occurrence of that value in `params` is
/// replaced, not only the one after the key.
pub fn redact_session_id(params: &str, placeholder: &str) -> String {
    match RE_SESSION_ID
        .captures(params)
        .and_then(|caps| caps.get(1))
        .filter(|m| !m.as_str().is_empty())
    {
        Some(value) => params.replace(value.as_str(), placeholder),
        None => params.to_string(),
    }
}
