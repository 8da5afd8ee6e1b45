//! cURL command import/export
//!
//! Import is a best-effort scan for a small set of flags, not a shell parser.
//! Every field is extracted independently and falls back to its default, so a
//! partial or mangled command still populates whatever it can.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::DEFAULT_METHOD;
use crate::error::ParseError;
use crate::models::{HttpMethod, KeyValueEntry, Request};
use crate::query::{build_query, parse_query};

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s'"]+"#).expect("url pattern"));

static METHOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)-X\s+(\w+)").expect("method pattern"));

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)(?:-H|--header)\s+['"]([^:'"]+):\s*([^'"]+)['"]"#).expect("header pattern")
});

// Body patterns, tried in order
static BODY_SINGLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:-d|--data(?:-raw|-binary)?)\s+'([^']*)'").expect("body pattern")
});

static BODY_DOUBLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)(?:-d|--data(?:-raw|-binary)?)\s+"((?:[^"\\]|\\.)*)""#).expect("body pattern")
});

static BODY_BARE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:-d|--data(?:-raw|-binary)?)\s+(\S.*)").expect("body pattern")
});

static NEXT_FLAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+-").expect("flag pattern"));

/// True when the trimmed input starts with the `curl` token
pub fn is_curl_command(input: &str) -> bool {
    let trimmed = input.trim_start();
    match trimmed.strip_prefix("curl") {
        Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
        None => false,
    }
}

/// Parse a cURL command into a Request.
///
/// Never fails: input without a leading `curl` is scanned the same way, and
/// every field missing from the input keeps its default (`GET`, empty URL,
/// no headers, no body).
pub fn parse_curl(input: &str) -> Request {
    let input = input.trim();
    let (url, params) = parse_url(input);
    let (body, has_body) = match parse_body(input) {
        Some(body) => (body, true),
        None => (String::new(), false),
    };

    let request = Request {
        method: parse_method(input),
        url,
        params,
        headers: parse_headers(input),
        body,
        has_body,
    };
    tracing::debug!(
        method = %request.method,
        url = %request.url,
        params = request.params.len(),
        headers = request.headers.len(),
        has_body = request.has_body,
        "Parsed curl command"
    );
    request
}

/// Parse only input that starts with the `curl` token
pub fn parse_curl_strict(input: &str) -> Result<Request, ParseError> {
    if !is_curl_command(input) {
        return Err(ParseError::NotCurl);
    }
    Ok(parse_curl(input))
}

fn parse_url(input: &str) -> (String, Vec<KeyValueEntry>) {
    let Some(found) = URL_RE.find(input) else {
        return (String::new(), Vec::new());
    };

    match found.as_str().split_once('?') {
        Some((base, query)) => {
            let params = parse_query(query)
                .into_iter()
                .map(|pair| KeyValueEntry::new(pair.key, pair.value))
                .collect();
            (base.to_string(), params)
        }
        None => (found.as_str().to_string(), Vec::new()),
    }
}

fn parse_method(input: &str) -> HttpMethod {
    METHOD_RE
        .captures(input)
        .map(|caps| HttpMethod::from_token(&caps[1]))
        .unwrap_or_else(|| HttpMethod::from_token(DEFAULT_METHOD))
}

// Repeated names are all kept, in source order
fn parse_headers(input: &str) -> Vec<KeyValueEntry> {
    HEADER_RE
        .captures_iter(input)
        .map(|caps| KeyValueEntry::new(caps[1].trim(), caps[2].trim()))
        .collect()
}

fn parse_body(input: &str) -> Option<String> {
    if let Some(caps) = BODY_SINGLE_RE.captures(input) {
        return Some(unescape(&caps[1]));
    }
    if let Some(caps) = BODY_DOUBLE_RE.captures(input) {
        return Some(unescape(&caps[1]));
    }
    let caps = BODY_BARE_RE.captures(input)?;
    let run = &caps[1];
    // The bare run stops at the next flag; search past the first char so the
    // argument itself may start with '-'.
    let end = NEXT_FLAG_RE
        .find_at(run, run.chars().next().map_or(0, char::len_utf8))
        .map_or(run.len(), |m| m.start());
    Some(unescape(run[..end].trim_end()))
}

fn unescape(s: &str) -> String {
    s.replace("\\\"", "\"")
        .replace("\\'", "'")
        .replace("\\n", "\n")
        .replace("\\t", "\t")
}

/// Format request as cURL command.
///
/// Flag order is fixed: method, enabled headers, URL with the enabled query,
/// then the body for POST/PUT/PATCH. Disabled rows are dropped, so this is
/// not an exact inverse of [`parse_curl`].
pub fn to_curl(request: &Request) -> String {
    let mut out = format!("curl -X {}", request.method);

    for header in request
        .headers
        .iter()
        .filter(|h| h.enabled && !h.key.is_empty())
    {
        let _ = write!(out, " -H \"{}: {}\"", header.key, header.value);
    }

    let query = build_query(&request.params, false);
    if query.is_empty() {
        let _ = write!(out, " \"{}\"", request.url);
    } else {
        let _ = write!(out, " \"{}?{}\"", request.url, query);
    }

    if request.method.has_body() && !request.body.is_empty() {
        let _ = write!(out, " -d '{}'", request.body);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pair;

    fn pairs(entries: &[KeyValueEntry]) -> Vec<Pair> {
        entries.iter().map(KeyValueEntry::to_pair).collect()
    }

    #[test]
    fn test_parse_simple_get() {
        let curl = "curl https://api.example.com/users";
        let req = parse_curl(curl);
        assert_eq!(req.url, "https://api.example.com/users");
        assert_eq!(req.method, HttpMethod::GET);
        assert_eq!(req.method.as_str(), DEFAULT_METHOD);
        assert!(req.params.is_empty());
        assert!(!req.has_body);
    }

    #[test]
    fn test_parse_post_with_data() {
        let curl = r#"curl -X POST -H "Content-Type: application/json" -d '{"a":1}' "https://e.com/p?x=1&y=2""#;
        let req = parse_curl(curl);
        assert_eq!(req.method, HttpMethod::POST);
        assert_eq!(req.url, "https://e.com/p");
        assert_eq!(pairs(&req.params), vec![Pair::new("x", "1"), Pair::new("y", "2")]);
        assert_eq!(
            pairs(&req.headers),
            vec![Pair::new("Content-Type", "application/json")]
        );
        assert_eq!(req.body, r#"{"a":1}"#);
        assert!(req.has_body);
        assert!(req.params.iter().chain(&req.headers).all(|e| e.enabled));
    }

    #[test]
    fn test_parse_method_case_normalized() {
        assert_eq!(parse_curl("curl -X patch https://e.com").method, HttpMethod::PATCH);
        assert_eq!(parse_curl("curl -X delete https://e.com").method, HttpMethod::DELETE);
    }

    #[test]
    fn test_parse_keeps_duplicate_headers_in_order() {
        let curl = r#"curl -H 'Accept: a' --header "X-Trace:  one " -H 'Accept: b' https://e.com"#;
        let req = parse_curl(curl);
        assert_eq!(
            pairs(&req.headers),
            vec![
                Pair::new("Accept", "a"),
                Pair::new("X-Trace", "one"),
                Pair::new("Accept", "b"),
            ]
        );
    }

    #[test]
    fn test_header_value_splits_on_first_colon() {
        let req = parse_curl(r#"curl -H "Referer: http://x.test:8080/a" https://e.com"#);
        assert_eq!(pairs(&req.headers), vec![Pair::new("Referer", "http://x.test:8080/a")]);
    }

    #[test]
    fn test_body_double_quoted_unescapes() {
        let curl = r#"curl -X POST --data "{\"name\":\"x\"}" https://e.com"#;
        assert_eq!(parse_curl(curl).body, r#"{"name":"x"}"#);
    }

    #[test]
    fn test_body_escape_sequences() {
        let curl = r"curl --data-raw 'line1\nline2\tend' https://e.com";
        assert_eq!(parse_curl(curl).body, "line1\nline2\tend");
    }

    #[test]
    fn test_body_bare_stops_at_next_flag() {
        let req = parse_curl("curl https://e.com --data-binary a=1&b=2 -H 'X: y'");
        assert_eq!(req.body, "a=1&b=2");
        assert_eq!(pairs(&req.headers), vec![Pair::new("X", "y")]);
    }

    #[test]
    fn test_empty_quoted_body_is_present() {
        let req = parse_curl("curl -X POST -d '' https://e.com");
        assert_eq!(req.body, "");
        assert!(req.has_body);
    }

    #[test]
    fn test_data_flag_not_matched_inside_words() {
        let req = parse_curl("curl -H 'X-Id: 1' https://e.com/a-d");
        assert!(!req.has_body);
    }

    #[test]
    fn test_no_url_is_not_a_failure() {
        let req = parse_curl("curl -X PUT -d 'x'");
        assert_eq!(req.url, "");
        assert_eq!(req.method, HttpMethod::PUT);
        assert_eq!(req.body, "x");
    }

    #[test]
    fn test_relaxed_scan_without_curl_token() {
        let req = parse_curl("http GET https://e.com/p?q=1");
        assert_eq!(req.url, "https://e.com/p");
        assert_eq!(pairs(&req.params), vec![Pair::new("q", "1")]);
    }

    #[test]
    fn test_strict_requires_curl_token() {
        assert!(is_curl_command("  curl https://e.com"));
        assert!(!is_curl_command("curly https://e.com"));
        assert_eq!(parse_curl_strict("wget https://e.com"), Err(ParseError::NotCurl));
        assert_eq!(parse_curl_strict("curl https://e.com").unwrap().url, "https://e.com");
    }

    #[test]
    fn test_to_curl_canonical_order() {
        let mut req = Request {
            method: HttpMethod::POST,
            url: "https://e.com/p".into(),
            body: r#"{"a":1}"#.into(),
            has_body: true,
            ..Default::default()
        };
        req.headers = vec![
            KeyValueEntry::new("Content-Type", "application/json"),
            KeyValueEntry::disabled("X-Off", "1"),
            KeyValueEntry::blank(),
        ];
        req.params = vec![
            KeyValueEntry::new("x", "1"),
            KeyValueEntry::disabled("y", "2"),
            KeyValueEntry::new("q", "a b"),
        ];
        assert_eq!(
            to_curl(&req),
            r#"curl -X POST -H "Content-Type: application/json" "https://e.com/p?x=1&q=a%20b" -d '{"a":1}'"#
        );
    }

    #[test]
    fn test_to_curl_omits_body_for_get() {
        let req = Request {
            url: "https://e.com".into(),
            body: "ignored".into(),
            has_body: true,
            ..Default::default()
        };
        assert_eq!(to_curl(&req), r#"curl -X GET "https://e.com""#);
    }

    #[test]
    fn test_to_curl_keeps_placeholders() {
        let req = Request {
            url: "{{HOST}}/users".into(),
            headers: vec![KeyValueEntry::new("Authorization", "Bearer {{TOKEN}}")],
            ..Default::default()
        };
        assert_eq!(
            to_curl(&req),
            r#"curl -X GET -H "Authorization: Bearer {{TOKEN}}" "{{HOST}}/users""#
        );
    }

    #[test]
    fn test_reparse_of_export() {
        let original = parse_curl(
            r#"curl -X PUT -H "Accept: */*" -d '{"k":"v"}' "https://e.com/p?x=1""#,
        );
        let again = parse_curl(&to_curl(&original));
        assert_eq!(again.method, original.method);
        assert_eq!(again.url, original.url);
        assert_eq!(pairs(&again.params), pairs(&original.params));
        assert_eq!(pairs(&again.headers), pairs(&original.headers));
        assert_eq!(again.body, original.body);
    }
}
