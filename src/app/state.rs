//! Composer state - one owned request plus its editor lists, no I/O

use crate::config::{default_preset_headers, PresetHeader};
use crate::curl;
use crate::kv_list::EditableKeyValueList;
use crate::models::{BodyMode, HttpMethod, KeyValueEntry, Request, Response, StoredRequest};
use crate::query::build_query;

/// The request being composed.
///
/// Editor lists are rebuilt wholesale whenever a different request is
/// selected; nothing carries over between selections.
#[derive(Clone, Debug)]
pub struct Composer {
    presets: Vec<PresetHeader>,

    // Selected stored request, if any
    pub request_id: Option<String>,
    pub name: String,

    // Request data
    pub method: HttpMethod,
    pub url: String,
    pub params: EditableKeyValueList,
    pub headers: EditableKeyValueList,
    pub body: String,
    pub body_mode: BodyMode,
    pub form: EditableKeyValueList,

    // Last completed response
    pub response: Option<Response>,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(default_preset_headers())
    }
}

impl Composer {
    pub fn new(presets: Vec<PresetHeader>) -> Self {
        let headers = EditableKeyValueList::new(preset_entries(&presets));
        Composer {
            presets,
            request_id: None,
            name: String::new(),
            method: HttpMethod::GET,
            url: String::new(),
            params: EditableKeyValueList::empty(),
            headers,
            body: String::new(),
            body_mode: BodyMode::None,
            form: EditableKeyValueList::empty(),
            response: None,
        }
    }

    /// Drop everything and start over from a blank request
    pub fn reset(&mut self) {
        *self = Composer::new(std::mem::take(&mut self.presets));
    }

    /// Populate every field from a stored command line.
    ///
    /// Parsed headers whose name matches a preset (case-insensitively) take
    /// over that preset's value and enabled flag in place; the rest are
    /// appended after the presets.
    pub fn select_request(&mut self, stored: &StoredRequest) {
        let parsed = curl::parse_curl(&stored.curl);
        let headers = merge_headers(preset_entries(&self.presets), parsed.headers);

        self.request_id = Some(stored.id.clone());
        self.name = stored.name.clone();
        self.method = parsed.method;
        self.url = parsed.url;
        self.params = EditableKeyValueList::new(parsed.params);
        self.headers = EditableKeyValueList::new(headers);
        self.body = parsed.body;
        self.body_mode = if parsed.has_body {
            BodyMode::Raw
        } else {
            BodyMode::None
        };
        self.form = EditableKeyValueList::empty();
        self.response = None;

        tracing::info!(
            id = %stored.id,
            method = %self.method,
            url = %self.url,
            "Request selected"
        );
    }

    /// Overlay a pasted command line onto the current request.
    ///
    /// Returns false when the text is not a curl command, leaving the paste to
    /// the caller. The method is always taken. URL, params, headers and body
    /// are overwritten only when the command line produced them; everything
    /// else is kept.
    pub fn paste_command_line(&mut self, text: &str) -> bool {
        let Ok(parsed) = curl::parse_curl_strict(text) else {
            return false;
        };

        self.method = parsed.method;
        if !parsed.url.is_empty() {
            self.url = parsed.url;
        }
        if !parsed.params.is_empty() {
            self.params = EditableKeyValueList::new(parsed.params);
        }
        if !parsed.headers.is_empty() {
            self.headers =
                EditableKeyValueList::new(merge_headers(preset_entries(&self.presets), parsed.headers));
        }
        if !parsed.body.is_empty() {
            self.body = parsed.body;
            self.body_mode = BodyMode::Raw;
        }

        tracing::info!(method = %self.method, url = %self.url, "Command line pasted");
        true
    }

    /// Snapshot of the current, unsubstituted fields
    pub fn request(&self) -> Request {
        let (body, has_body) = match self.body_mode {
            BodyMode::None => (String::new(), false),
            BodyMode::Raw => (self.body.clone(), true),
            BodyMode::UrlEncoded => (build_query(self.form.entries(), false), true),
        };
        Request {
            method: self.method.clone(),
            url: self.url.clone(),
            params: self.params.entries().to_vec(),
            headers: self.headers.entries().to_vec(),
            body,
            has_body,
        }
    }
}

fn preset_entries(presets: &[PresetHeader]) -> Vec<KeyValueEntry> {
    presets.iter().map(PresetHeader::to_entry).collect()
}

fn merge_headers(mut merged: Vec<KeyValueEntry>, parsed: Vec<KeyValueEntry>) -> Vec<KeyValueEntry> {
    for header in parsed {
        match merged
            .iter_mut()
            .find(|h| h.preset && h.key.eq_ignore_ascii_case(&header.key))
        {
            Some(preset) => {
                preset.value = header.value;
                preset.enabled = header.enabled;
            }
            None => merged.push(KeyValueEntry {
                preset: false,
                ..header
            }),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pair;

    fn stored(curl: &str) -> StoredRequest {
        StoredRequest {
            id: "r1".into(),
            name: "Create user".into(),
            method: "POST".into(),
            curl: curl.into(),
        }
    }

    fn header_pairs(composer: &Composer) -> Vec<(Pair, bool)> {
        composer
            .headers
            .entries()
            .iter()
            .map(|h| (h.to_pair(), h.preset))
            .collect()
    }

    #[test]
    fn test_new_has_presets_and_blank_rows() {
        let composer = Composer::default();
        assert_eq!(composer.method, HttpMethod::GET);
        assert_eq!(composer.headers.len(), 5);
        assert!(composer.headers.entries()[..4].iter().all(|h| h.preset && h.enabled));
        assert!(composer.headers.entries()[4].is_blank());
        assert_eq!(composer.params.len(), 1);
    }

    #[test]
    fn test_select_request_populates_fields() {
        let mut composer = Composer::default();
        composer.select_request(&stored(
            r#"curl -X POST -H "Content-Type: application/json" -d '{"a":1}' "https://e.com/p?x=1&y=2""#,
        ));

        assert_eq!(composer.request_id.as_deref(), Some("r1"));
        assert_eq!(composer.name, "Create user");
        assert_eq!(composer.method, HttpMethod::POST);
        assert_eq!(composer.url, "https://e.com/p");
        assert_eq!(
            composer.params.pairs(),
            vec![Pair::new("x", "1"), Pair::new("y", "2")]
        );
        assert_eq!(composer.body, r#"{"a":1}"#);
        assert_eq!(composer.body_mode, BodyMode::Raw);
        let last = composer.headers.entries().last().unwrap();
        assert!(last.is_blank());
        let custom = &composer.headers.entries()[4];
        assert_eq!(custom.to_pair(), Pair::new("Content-Type", "application/json"));
        assert!(!custom.preset);
    }

    #[test]
    fn test_parsed_header_replaces_preset_in_place() {
        let mut composer = Composer::default();
        composer.select_request(&stored(
            r#"curl -H "accept: application/json" -H "X-Id: 7" https://e.com"#,
        ));

        let headers = header_pairs(&composer);
        assert_eq!(headers[1], (Pair::new("Accept", "application/json"), true));
        assert_eq!(headers[4], (Pair::new("X-Id", "7"), false));
        assert_eq!(headers.len(), 6);
    }

    #[test]
    fn test_select_without_body_flag() {
        let mut composer = Composer::default();
        composer.select_request(&stored("curl https://e.com"));
        assert_eq!(composer.body_mode, BodyMode::None);
        assert!(!composer.request().has_body);
    }

    #[test]
    fn test_reselect_discards_previous_lists() {
        let mut composer = Composer::default();
        composer.select_request(&stored("curl -H 'X-A: 1' 'https://a.com?q=1'"));
        let old_ids: Vec<_> = composer.headers.entries().iter().map(|h| h.id).collect();

        composer.select_request(&stored("curl https://b.com"));
        assert_eq!(composer.url, "https://b.com");
        assert_eq!(composer.params.len(), 1);
        assert_eq!(composer.headers.len(), 5);
        assert!(composer
            .headers
            .entries()
            .iter()
            .all(|h| !old_ids.contains(&h.id)));
    }

    #[test]
    fn test_reset_restores_blank_request() {
        let mut composer = Composer::new(vec![PresetHeader::new("Accept", "*/*")]);
        composer.select_request(&stored("curl -X DELETE https://e.com/1"));
        composer.reset();
        assert_eq!(composer.request_id, None);
        assert_eq!(composer.method, HttpMethod::GET);
        assert_eq!(composer.url, "");
        assert_eq!(composer.headers.len(), 2);
    }

    #[test]
    fn test_paste_keeps_fields_the_command_lacks() {
        let mut composer = Composer::default();
        composer.select_request(&stored(
            r#"curl -H "X-Trace: on" -d 'keep' "https://e.com/old?a=1""#,
        ));

        assert!(composer.paste_command_line("  curl -X PUT https://e.com/new"));
        assert_eq!(composer.request_id.as_deref(), Some("r1"));
        assert_eq!(composer.method, HttpMethod::PUT);
        assert_eq!(composer.url, "https://e.com/new");
        assert_eq!(composer.params.pairs(), vec![Pair::new("a", "1")]);
        assert_eq!(header_pairs(&composer)[4], (Pair::new("X-Trace", "on"), false));
        assert_eq!(composer.body, "keep");
        assert_eq!(composer.body_mode, BodyMode::Raw);
    }

    #[test]
    fn test_paste_replaces_fields_the_command_has() {
        let mut composer = Composer::default();
        composer.url = "https://e.com/typed".into();
        composer.body_mode = BodyMode::UrlEncoded;

        assert!(composer.paste_command_line(
            r#"curl -X POST -H "accept: text/plain" -H "X-New: 1" -d 'hi' "https://e.com/p?q=2""#,
        ));
        assert_eq!(composer.url, "https://e.com/p");
        assert_eq!(composer.params.pairs(), vec![Pair::new("q", "2")]);
        let headers = header_pairs(&composer);
        assert_eq!(headers[1], (Pair::new("Accept", "text/plain"), true));
        assert_eq!(headers[4], (Pair::new("X-New", "1"), false));
        assert_eq!(headers.len(), 6);
        assert_eq!(composer.body, "hi");
        assert_eq!(composer.body_mode, BodyMode::Raw);
    }

    #[test]
    fn test_paste_ignores_plain_text() {
        let mut composer = Composer::default();
        composer.url = "https://e.com".into();
        assert!(!composer.paste_command_line("https://other.com"));
        assert_eq!(composer.url, "https://e.com");
    }

    #[test]
    fn test_snapshot_uses_form_for_urlencoded() {
        let mut composer = Composer::default();
        composer.body = "raw text".into();
        composer.body_mode = BodyMode::UrlEncoded;
        composer.form = EditableKeyValueList::new(vec![KeyValueEntry::new("a b", "1")]);
        let request = composer.request();
        assert_eq!(request.body, "a%20b=1");
        assert!(request.has_body);
    }
}
