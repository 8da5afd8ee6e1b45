//! Transport boundary - hands resolved requests to an external sender

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::SendError;
use crate::models::{ResolvedRequest, Response};

/// External capability that performs the actual HTTP exchange
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ResolvedRequest) -> anyhow::Result<Response>;
}

/// Result of a send that was not refused
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Completed(Response),
    Cancelled,
}

/// Caller side of a cancellation pair
#[derive(Debug)]
pub struct CancelHandle(oneshot::Sender<()>);

impl CancelHandle {
    /// Abort the in-flight send
    pub fn cancel(self) {
        let _ = self.0.send(());
    }
}

/// Send side of a cancellation pair
#[derive(Debug)]
pub struct CancelToken(oneshot::Receiver<()>);

impl CancelToken {
    /// A token that never fires
    pub fn detached() -> Self {
        let (_tx, rx) = oneshot::channel();
        CancelToken(rx)
    }
}

pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = oneshot::channel();
    (CancelHandle(tx), CancelToken(rx))
}

/// Execute a resolved request, racing it against cancellation.
///
/// Transport errors are passed through verbatim; there is no retry.
pub async fn execute_request<T>(
    transport: &T,
    request: ResolvedRequest,
    cancel: CancelToken,
) -> Result<SendOutcome, SendError>
where
    T: Transport + ?Sized,
{
    let mut cancel_rx = cancel.0;
    let method = request.method.clone();
    let url = request.url.clone();
    tracing::info!(%method, %url, "Executing request");

    tokio::select! {
        biased;

        // A dropped handle resolves to Err and disables this branch
        Ok(()) = &mut cancel_rx => {
            tracing::info!(%method, %url, "Request cancelled");
            Ok(SendOutcome::Cancelled)
        }
        result = transport.send(request) => match result {
            Ok(response) => {
                tracing::info!(%method, %url, status = response.status, elapsed_ms = response.elapsed_ms, "Request completed");
                Ok(SendOutcome::Completed(response))
            }
            Err(e) => {
                tracing::warn!(%method, %url, error = %e, "Request failed");
                Err(SendError::Transport(format!("{e:#}")))
            }
        },
    }
}
