//! Error types for the request engine
//!
//! Parsing is best-effort and never fails on content; the only parse error is
//! the strict leading-token check. Structural refusals in key-value lists are
//! silent no-ops and have no error type.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of the strict command-line entry point
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("input does not start with a curl command")]
    NotCurl,
}

/// Reasons a send is refused or fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("request URL is empty")]
    EmptyUrl,
    /// Pre-flight gate: the named variables have no binding in the active environment
    #[error("missing variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),
    #[error("{0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("name is required")]
    EmptyName,
    #[error("no request selected")]
    NothingSelected,
}
