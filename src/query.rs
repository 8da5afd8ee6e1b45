//! URL query-string codec
//!
//! Decoding never fails: a field whose percent-decoding is not valid UTF-8
//! keeps its raw text.

use std::borrow::Cow;

use crate::models::{KeyValueEntry, Pair};

/// Parse a raw query string (without the leading `?`) into ordered pairs.
///
/// Segments without `=` and segments with an empty key are skipped.
pub fn parse_query(raw: &str) -> Vec<Pair> {
    raw.split('&')
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| {
            let (key, value) = segment.split_once('=')?;
            if key.is_empty() {
                return None;
            }
            Some(Pair::new(decode(key), decode(value)))
        })
        .collect()
}

/// Build a query string from rows.
///
/// Only enabled rows with a non-empty key are included unless
/// `include_disabled` is set. No leading `?` is emitted.
pub fn build_query<'a, I>(entries: I, include_disabled: bool) -> String
where
    I: IntoIterator<Item = &'a KeyValueEntry>,
{
    entries
        .into_iter()
        .filter(|e| (include_disabled || e.enabled) && !e.key.is_empty())
        .map(|e| format!("{}={}", encode(&e.key), encode(&e.value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Paste parser for the params editor.
///
/// Accepts a full URL or a bare query string. Returns `None` when the text
/// does not look like a query at all, so the paste falls through.
pub fn parse_pasted_query(text: &str) -> Option<Vec<Pair>> {
    if !text.contains(['?', '&', '=']) {
        return None;
    }

    let mut query = text.trim();
    if let Some((_, rest)) = query.split_once('?') {
        query = rest;
    }
    if let Some((before, _)) = query.split_once('#') {
        query = before;
    }

    let pairs: Vec<Pair> = query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            let key = decode(key.trim());
            if key.is_empty() {
                return None;
            }
            Some(Pair::new(key, decode(value.trim())))
        })
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs)
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

fn encode(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}
