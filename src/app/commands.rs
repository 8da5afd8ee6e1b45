//! Command handlers - command-line preview, pre-flight checks and sending

use std::collections::{BTreeMap, BTreeSet};

use crate::app::Composer;
use crate::curl;
use crate::error::{SendError, StoreError};
use crate::models::{BodyMode, KeyValueEntry, ResolvedRequest, StoredRequest, Variable};
use crate::network::{execute_request, CancelToken, SendOutcome, Transport};
use crate::query::build_query;
use crate::storage::Store;
use crate::variables::{check_request, missing_in_entries, missing_references, substitute};

impl Composer {
    // ========================
    // Command-line view
    // ========================

    /// The human-facing command line, placeholders left intact
    pub fn to_curl(&self) -> String {
        curl::to_curl(&self.request())
    }

    /// Select a stored request by id
    pub fn open_request(&mut self, store: &impl Store, id: &str) -> Result<(), StoreError> {
        let stored = store.load_request(id)?;
        self.select_request(&stored);
        Ok(())
    }

    /// Write the current fields back as the stored command line
    pub fn save_request(&self, store: &mut impl Store) -> Result<StoredRequest, StoreError> {
        let id = self.request_id.clone().ok_or(StoreError::NothingSelected)?;
        let stored = StoredRequest {
            id,
            name: self.name.clone(),
            method: self.method.to_string(),
            curl: self.to_curl(),
        };
        store.save_request(stored.clone());
        tracing::info!(id = %stored.id, "Request saved");
        Ok(stored)
    }

    /// Pretty-print a JSON raw body. Returns false when the body is not JSON.
    pub fn format_json_body(&mut self) -> bool {
        match serde_json::from_str::<serde_json::Value>(&self.body) {
            Ok(json) => match serde_json::to_string_pretty(&json) {
                Ok(pretty) => {
                    self.body = pretty;
                    true
                }
                Err(_) => false,
            },
            Err(_) => false,
        }
    }

    // ========================
    // Variables
    // ========================

    /// Unresolved references across everything that would be sent
    pub fn check_variables(&self, bindings: &[Variable]) -> BTreeSet<String> {
        let body = match self.body_mode {
            BodyMode::Raw => self.body.as_str(),
            BodyMode::None | BodyMode::UrlEncoded => "",
        };
        let mut missing = check_request(
            &self.url,
            self.params.entries(),
            self.headers.entries(),
            body,
            bindings,
        );
        if self.body_mode == BodyMode::UrlEncoded {
            missing.extend(missing_in_entries(self.form.entries(), bindings));
        }
        missing
    }

    /// Unresolved references in the URL field alone
    pub fn url_missing_variables(&self, bindings: &[Variable]) -> BTreeSet<String> {
        missing_references(&self.url, bindings)
    }

    // ========================
    // Request sending
    // ========================

    /// Pre-flight gate and substitution.
    ///
    /// Refuses a blank URL and any unresolved reference; otherwise returns the
    /// request with URL, enabled params, enabled headers and body substituted
    /// independently.
    pub fn resolve(&self, bindings: &[Variable]) -> Result<ResolvedRequest, SendError> {
        if self.url.trim().is_empty() {
            return Err(SendError::EmptyUrl);
        }

        let missing = self.check_variables(bindings);
        if !missing.is_empty() {
            tracing::warn!(missing = ?missing, "Send refused, unresolved variables");
            return Err(SendError::MissingVariables(missing.into_iter().collect()));
        }

        let url = substitute(&self.url, bindings);
        let query = build_query(&substitute_entries(self.params.entries(), bindings), false);
        let url = if query.is_empty() {
            url
        } else {
            let separator = if url.contains('?') { '&' } else { '?' };
            format!("{url}{separator}{query}")
        };

        let headers: BTreeMap<String, String> = self
            .headers
            .enabled()
            .filter(|h| !h.key.is_empty() && !h.value.is_empty())
            .map(|h| (substitute(&h.key, bindings), substitute(&h.value, bindings)))
            .collect();

        let body = match self.body_mode {
            BodyMode::Raw if !self.body.is_empty() => Some(substitute(&self.body, bindings)),
            BodyMode::UrlEncoded => {
                let encoded = build_query(&substitute_entries(self.form.entries(), bindings), false);
                (!encoded.is_empty()).then_some(encoded)
            }
            _ => None,
        };

        Ok(ResolvedRequest {
            method: self.method.to_string(),
            url,
            headers,
            body,
        })
    }

    /// Resolve and hand the request to the transport.
    ///
    /// The previous response is cleared up front; a new one is recorded only
    /// when the send completes. A cancelled send leaves no response behind.
    pub async fn send<T>(
        &mut self,
        transport: &T,
        bindings: &[Variable],
        cancel: CancelToken,
    ) -> Result<SendOutcome, SendError>
    where
        T: Transport + ?Sized,
    {
        let resolved = self.resolve(bindings)?;
        self.response = None;

        let outcome = execute_request(transport, resolved, cancel).await?;
        if let SendOutcome::Completed(response) = &outcome {
            self.response = Some(response.clone());
        }
        Ok(outcome)
    }
}

// Enabled rows only, with key and value substituted
fn substitute_entries(entries: &[KeyValueEntry], bindings: &[Variable]) -> Vec<KeyValueEntry> {
    entries
        .iter()
        .filter(|e| e.enabled)
        .map(|e| KeyValueEntry {
            key: substitute(&e.key, bindings),
            value: substitute(&e.value, bindings),
            ..e.clone()
        })
        .collect()
}
