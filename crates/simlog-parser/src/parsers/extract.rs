//! Pattern extraction over the free-text `error` column of a failed request.
//!
//! Each extractor returns `None` when its pattern is absent; callers decide
//! which sentinel to substitute.

use regex::Regex;
use std::sync::LazyLock;

// `HTTP Code: 500,` or `HTTP Code: Timeout(504),`
static RE_RESPONSE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"HTTP Code: ?([a-zA-Z]*?\(?(\d+)\)?),").unwrap());

static RE_ERROR_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[cC]ode": ?"?(-?\d+)"?,"#).unwrap());

static RE_REQUEST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Request: ?(.+?) ").unwrap());

static RE_METHOD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" ([A-Z]+) headers").unwrap());

static RE_HEADERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"headers: ?(.+?) ?,").unwrap());

static RE_RESPONSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Response: ?(.+)$").unwrap());

/// Request target split out of the `Request:` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub url: String,
    /// Final `?`-delimited segment, empty when there is no query string.
    pub params: String,
    /// Uppercase word right before `headers`, if present.
    pub method: Option<String>,
}

fn capture(re: &Regex, text: &str, group: usize) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Digits of the HTTP status, e.g. `504` from `HTTP Code: Timeout(504),`.
pub fn response_code(text: &str) -> Option<String> {
    capture(&RE_RESPONSE_CODE, text, 2)
}

/// Application error code from a JSON-ish `"code": "-32000",` fragment.
pub fn error_code(text: &str) -> Option<String> {
    capture(&RE_ERROR_CODE, text, 1)
}

/// URL, query params and method from `Request: <token> ... <METHOD> headers`.
pub fn request_line(text: &str) -> Option<RequestLine> {
    let token = capture(&RE_REQUEST, text, 1)?;
    let parts: Vec<&str> = token.split('?').collect();
    let url = parts[0].to_string();
    let params = if parts.len() >= 2 {
        parts[parts.len() - 1].to_string()
    } else {
        String::new()
    };

    Some(RequestLine {
        url,
        params,
        method: capture(&RE_METHOD, text, 1),
    })
}

/// Text between `headers:` and the next comma.
pub fn headers(text: &str) -> Option<String> {
    capture(&RE_HEADERS, text, 1)
}

/// Everything after `Response:` up to the end of the text.
pub fn response_body(text: &str) -> Option<String> {
    capture(&RE_RESPONSE, text, 1)
}
