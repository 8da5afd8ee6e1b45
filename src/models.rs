use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::constants::BODY_METHODS;

/// HTTP Method
///
/// Any token given to `-X` is accepted; unknown verbs are kept as `Other`
/// in upper case.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
    OPTIONS,
    Other(String),
}

impl HttpMethod {
    /// Case-normalizes a method token
    pub fn from_token(token: &str) -> HttpMethod {
        match token.to_uppercase().as_str() {
            "GET" => HttpMethod::GET,
            "POST" => HttpMethod::POST,
            "PUT" => HttpMethod::PUT,
            "PATCH" => HttpMethod::PATCH,
            "DELETE" => HttpMethod::DELETE,
            "HEAD" => HttpMethod::HEAD,
            "OPTIONS" => HttpMethod::OPTIONS,
            other => HttpMethod::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::Other(s) => s,
        }
    }

    pub fn has_body(&self) -> bool {
        BODY_METHODS.contains(&self.as_str())
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for HttpMethod {
    fn from(s: String) -> Self {
        HttpMethod::from_token(&s)
    }
}

impl From<HttpMethod> for String {
    fn from(m: HttpMethod) -> Self {
        m.as_str().to_string()
    }
}

/// Stable identity of a key-value row. Minted once, never derived from content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        EntryId(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A bare key/value pair as produced by parsers, before it becomes a row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub key: String,
    pub value: String,
}

impl Pair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Pair {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One row of an editable key-value list (header, param, variable, form field)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueEntry {
    pub id: EntryId,
    pub enabled: bool,
    pub key: String,
    pub value: String,
    /// Fixed default row: key is immutable and the row cannot be removed
    #[serde(default)]
    pub preset: bool,
}

impl KeyValueEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        KeyValueEntry {
            id: EntryId::new(),
            enabled: true,
            key: key.into(),
            value: value.into(),
            preset: false,
        }
    }

    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        KeyValueEntry {
            enabled: false,
            ..KeyValueEntry::new(key, value)
        }
    }

    pub fn blank() -> Self {
        KeyValueEntry::disabled("", "")
    }

    pub fn preset(key: impl Into<String>, value: impl Into<String>, enabled: bool) -> Self {
        KeyValueEntry {
            enabled,
            preset: true,
            ..KeyValueEntry::new(key, value)
        }
    }

    /// Fresh row from parsed content; enabled only when fully populated
    pub fn from_pair(pair: Pair) -> Self {
        let enabled = !pair.key.is_empty() && !pair.value.is_empty();
        KeyValueEntry {
            enabled,
            ..KeyValueEntry::new(pair.key, pair.value)
        }
    }

    pub fn is_blank(&self) -> bool {
        self.key.is_empty() && self.value.is_empty()
    }

    pub fn to_pair(&self) -> Pair {
        Pair::new(self.key.clone(), self.value.clone())
    }
}

/// How the body is sent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyMode {
    #[default]
    None,
    Raw,
    UrlEncoded,
}

/// The structured, editable form of a request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: HttpMethod,
    /// Scheme, host and path only; the query lives in `params`
    pub url: String,
    pub params: Vec<KeyValueEntry>,
    pub headers: Vec<KeyValueEntry>,
    pub body: String,
    /// True when a data flag was present, even with an empty argument
    pub has_body: bool,
}

impl Default for Request {
    fn default() -> Self {
        Request {
            method: HttpMethod::GET,
            url: String::new(),
            params: Vec::new(),
            headers: Vec::new(),
            body: String::new(),
            has_body: false,
        }
    }
}

/// A variable binding of an environment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
}

impl Variable {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Variable {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Named set of variable bindings, unique by key
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl Environment {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Environment {
            id: id.into(),
            name: name.into(),
            variables: Vec::new(),
        }
    }

    /// Sets a binding, replacing the value in place when the key exists
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.variables.iter_mut().find(|v| v.key == key) {
            Some(existing) => existing.value = value,
            None => self.variables.push(Variable { key, value }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }
}

/// A request as persisted: the command line is the source of truth
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub method: String,
    pub curl: String,
}

/// Fully substituted request handed to the transport
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRequest {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

/// Response from the transport
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub elapsed_ms: u64,
    pub size_bytes: usize,
}

impl Response {
    /// Body pretty-printed when it is JSON, verbatim otherwise
    pub fn pretty_body(&self) -> String {
        match serde_json::from_str::<serde_json::Value>(&self.body) {
            Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| self.body.clone()),
            Err(_) => self.body.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_normalizes_case() {
        assert_eq!(HttpMethod::from_token("post"), HttpMethod::POST);
        assert_eq!(
            HttpMethod::from_token("purge"),
            HttpMethod::Other("PURGE".into())
        );
        assert_eq!(HttpMethod::from_token("purge").as_str(), "PURGE");
    }

    #[test]
    fn test_method_serializes_as_string() {
        let json = serde_json::to_string(&HttpMethod::PATCH).unwrap();
        assert_eq!(json, "\"PATCH\"");
        let back: HttpMethod = serde_json::from_str("\"delete\"").unwrap();
        assert_eq!(back, HttpMethod::DELETE);
    }

    #[test]
    fn test_body_methods() {
        assert!(HttpMethod::POST.has_body());
        assert!(HttpMethod::PATCH.has_body());
        assert!(!HttpMethod::GET.has_body());
        assert!(!HttpMethod::DELETE.has_body());
    }

    #[test]
    fn test_entry_from_pair_enables_only_when_full() {
        assert!(KeyValueEntry::from_pair(Pair::new("a", "1")).enabled);
        assert!(!KeyValueEntry::from_pair(Pair::new("a", "")).enabled);
        assert!(KeyValueEntry::blank().is_blank());
    }

    #[test]
    fn test_entry_ids_are_unique() {
        let a = KeyValueEntry::new("k", "v");
        let b = KeyValueEntry::new("k", "v");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_environment_set_replaces_in_place() {
        let mut env = Environment::new("dev", "Development");
        env.set("HOST", "a");
        env.set("TOKEN", "t");
        env.set("HOST", "b");
        assert_eq!(env.variables.len(), 2);
        assert_eq!(env.variables[0].key, "HOST");
        assert_eq!(env.get("HOST"), Some("b"));
        assert_eq!(env.get("MISSING"), None);
    }

    #[test]
    fn test_pretty_body() {
        let resp = Response {
            status: 200,
            status_text: "OK".into(),
            headers: BTreeMap::new(),
            body: r#"{"a":1}"#.into(),
            elapsed_ms: 3,
            size_bytes: 7,
        };
        assert_eq!(resp.pretty_body(), "{\n  \"a\": 1\n}");

        let text = Response {
            body: "plain".into(),
            ..resp
        };
        assert_eq!(text.pretty_body(), "plain");
    }
}
