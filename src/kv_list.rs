//! Editable ordered key-value list
//!
//! Backs every key-value editor (headers, params, variables, form body). All
//! views share the same reconciliation rules and differ only in the paste
//! parser they pass in.
//!
//! Invariants:
//! - at least one blank row (empty key and value) is always present
//! - preset rows are never removed and their key never changes
//! - the last non-preset row is never removed
//! - row ids are minted on insertion and never reused

use crate::models::{EntryId, KeyValueEntry, Pair};

/// Which half of a row an edit targets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Key,
    Value,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditableKeyValueList {
    entries: Vec<KeyValueEntry>,
}

impl Default for EditableKeyValueList {
    fn default() -> Self {
        Self::empty()
    }
}

impl EditableKeyValueList {
    /// Adopt existing rows, adding a trailing blank row when none is blank
    pub fn new(entries: Vec<KeyValueEntry>) -> Self {
        let mut list = EditableKeyValueList { entries };
        list.ensure_blank_row();
        list
    }

    /// A list holding only the blank row
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn entries(&self) -> &[KeyValueEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<KeyValueEntry> {
        self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&KeyValueEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn enabled(&self) -> impl Iterator<Item = &KeyValueEntry> {
        self.entries.iter().filter(|e| e.enabled)
    }

    /// Content of every row with a key, regardless of its enabled flag
    pub fn pairs(&self) -> Vec<Pair> {
        self.entries
            .iter()
            .filter(|e| !e.key.is_empty())
            .map(KeyValueEntry::to_pair)
            .collect()
    }

    /// Whether `remove(id)` would take effect
    pub fn can_remove(&self, id: EntryId) -> bool {
        match self.get(id) {
            Some(entry) if !entry.preset => self.non_preset_count() > 1,
            _ => false,
        }
    }

    /// Edit the key or value of a row.
    ///
    /// The row is enabled exactly when both fields are non-empty afterwards.
    /// This overrides an earlier manual toggle. Typing into a trailing blank
    /// row grows a new blank row below it; filling the only blank row anywhere
    /// else appends one at the end. Returns false when refused (unknown id or
    /// preset key).
    pub fn edit(&mut self, id: EntryId, field: Field, value: impl Into<String>) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let value = value.into();
        let is_last = index + 1 == self.entries.len();
        let entry = &mut self.entries[index];

        if entry.preset && field == Field::Key {
            return false;
        }

        let was_blank = entry.is_blank();
        let grows = is_last && was_blank && !value.is_empty();

        match field {
            Field::Key => entry.key = value,
            Field::Value => entry.value = value,
        }
        entry.enabled = !entry.key.is_empty() && !entry.value.is_empty();

        if grows {
            self.entries.push(KeyValueEntry::blank());
        }
        self.ensure_blank_row();
        true
    }

    /// Set the enabled flag directly. Content and row count are untouched.
    pub fn toggle(&mut self, id: EntryId, enabled: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Remove a row. Refused for presets and for the last non-preset row.
    pub fn remove(&mut self, id: EntryId) -> bool {
        if !self.can_remove(id) {
            return false;
        }
        self.entries.retain(|e| e.id != id);
        self.ensure_blank_row();
        true
    }

    /// Paste text into a row.
    ///
    /// Returns false when `parse` yields nothing, leaving the default paste to
    /// the caller. A blank target row is replaced in place by the parsed rows;
    /// any other target keeps its content and the rows go right after it.
    pub fn paste_into<F>(&mut self, id: EntryId, text: &str, parse: F) -> bool
    where
        F: FnOnce(&str) -> Option<Vec<Pair>>,
    {
        let Some(index) = self.position(id) else {
            return false;
        };
        let parsed: Vec<KeyValueEntry> = match parse(text) {
            Some(pairs) if !pairs.is_empty() => {
                pairs.into_iter().map(KeyValueEntry::from_pair).collect()
            }
            _ => return false,
        };

        tracing::debug!(rows = parsed.len(), "Paste intercepted");
        if self.entries[index].is_blank() {
            self.entries.splice(index..=index, parsed);
        } else {
            self.entries.splice(index + 1..index + 1, parsed);
        }
        self.ensure_blank_row();
        true
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn non_preset_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.preset).count()
    }

    fn ensure_blank_row(&mut self) {
        if !self.entries.iter().any(KeyValueEntry::is_blank) {
            self.entries.push(KeyValueEntry::blank());
        }
    }
}

/// Paste parser for headers, variables and form fields: one `key: value` or
/// `key=value` pair per line.
///
/// Single-line text without a delimiter is not intercepted.
pub fn parse_pasted_lines(text: &str) -> Option<Vec<Pair>> {
    let pairs: Vec<Pair> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (key, value) = split_line(line)?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some(Pair::new(key, value.trim()))
        })
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs)
    }
}

// Whichever of ':' and '=' comes first delimits the line
fn split_line(line: &str) -> Option<(&str, &str)> {
    let at = line.find([':', '='])?;
    Some((&line[..at], &line[at + 1..]))
}
