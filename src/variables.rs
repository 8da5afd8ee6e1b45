//! `{{name}}` variable templating
//!
//! Finding and substituting share one pattern, so any reference that is
//! reported can also be replaced.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::{KeyValueEntry, Variable};

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("reference pattern")
});

/// Names referenced in `text`, deduplicated
pub fn find_references(text: &str) -> BTreeSet<String> {
    REFERENCE_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Replace every bound reference with its value.
///
/// Unbound references are left verbatim. Values are inserted literally and
/// are not scanned again. When a key is bound twice the first binding wins.
pub fn substitute(text: &str, bindings: &[Variable]) -> String {
    REFERENCE_RE
        .replace_all(text, |caps: &Captures| {
            match bindings.iter().find(|b| !b.key.is_empty() && b.key == caps[1]) {
                Some(binding) => binding.value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// References in `text` with no binding
pub fn missing_references(text: &str, bindings: &[Variable]) -> BTreeSet<String> {
    find_references(text)
        .into_iter()
        .filter(|name| !bindings.iter().any(|b| &b.key == name))
        .collect()
}

/// Missing references across the key and value of enabled rows
pub fn missing_in_entries<'a, I>(entries: I, bindings: &[Variable]) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a KeyValueEntry>,
{
    entries
        .into_iter()
        .filter(|e| e.enabled)
        .flat_map(|e| {
            let mut missing = missing_references(&e.key, bindings);
            missing.extend(missing_references(&e.value, bindings));
            missing
        })
        .collect()
}

/// Pre-send check: all unresolved names across URL, enabled params, enabled
/// headers and body. Disabled rows never block a send.
pub fn check_request(
    url: &str,
    params: &[KeyValueEntry],
    headers: &[KeyValueEntry],
    body: &str,
    bindings: &[Variable],
) -> BTreeSet<String> {
    let mut missing = missing_references(url, bindings);
    missing.extend(missing_in_entries(params, bindings));
    missing.extend(missing_in_entries(headers, bindings));
    missing.extend(missing_references(body, bindings));
    missing
}
