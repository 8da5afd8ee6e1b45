//! # Callisto
//!
//! Request-representation engine for an API client.
//!
//! ## Features
//! - Query string encode/decode
//! - curl command-line import/export
//! - `{{name}}` variable templates with a pre-send check
//! - Editable key-value lists with a trailing blank row and protected presets
//! - Request composer tying the above to an external transport
//!
//! ## Architecture
//! - Pure text layer: `query`, `curl`, `variables`
//! - Editor layer: `kv_list`, `app`
//! - Boundaries: `network` (transport), `storage` (persistence), `config`

pub mod app;
pub mod config;
pub mod constants;
pub mod curl;
pub mod error;
pub mod kv_list;
pub mod models;
pub mod network;
pub mod query;
pub mod storage;
pub mod variables;

// Re-export commonly used types
pub use app::{Composer, EnvironmentEditor};
pub use config::Config;
pub use curl::{parse_curl, parse_curl_strict, to_curl};
pub use error::{ConfigError, ParseError, SendError, StoreError};
pub use kv_list::{EditableKeyValueList, Field};
pub use models::{
    BodyMode, EntryId, Environment, HttpMethod, KeyValueEntry, Pair, Request, ResolvedRequest,
    Response, StoredRequest, Variable,
};
pub use network::{cancel_pair, CancelHandle, CancelToken, SendOutcome, Transport};
pub use storage::{MemoryStore, Store};
