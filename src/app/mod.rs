//! App layer - the request composer and environment editor
//!
//! The composer owns one request plus its editor lists and exposes the
//! command-line view, the pre-flight variable check and the send.

pub mod commands;
pub mod environment;
pub mod state;

pub use environment::EnvironmentEditor;
pub use state::Composer;
