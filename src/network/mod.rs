//! Network layer - the boundary to the external HTTP transport
//!
//! The engine never performs I/O itself; it resolves a request and races the
//! transport future against a cancellation token.

pub mod client;

pub use client::{cancel_pair, execute_request, CancelHandle, CancelToken, SendOutcome, Transport};
