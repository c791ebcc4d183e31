//! Cooperative cancellation for in-flight requests.
//!
//! An [`AbortController`] owns the right to cancel; the [`AbortSignal`]s it
//! hands out travel with requests and are observed by the client. Once fired a
//! signal stays fired.

use tokio_util::sync::CancellationToken;

/// Owner side of an abort signal.
#[derive(Debug, Clone, Default)]
pub struct AbortController {
    token: CancellationToken,
}

impl AbortController {
    /// Creates a controller whose signal has not fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a signal observing this controller.
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            token: self.token.clone(),
        }
    }

    /// Fires the signal. Calling this more than once has no further effect.
    pub fn abort(&self) {
        if !self.token.is_cancelled() {
            tracing::debug!("abort signalled");
        }
        self.token.cancel();
    }

    /// Returns `true` once [`AbortController::abort`] has been called.
    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Observer side of an abort signal, attached to an [`crate::HttpRequest`].
#[derive(Debug, Clone)]
pub struct AbortSignal {
    token: CancellationToken,
}

impl AbortSignal {
    /// Returns `true` if the signal has already fired.
    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when the signal fires (immediately if it already has).
    ///
    /// Dropping the returned future detaches the listener.
    pub async fn aborted(&self) {
        self.token.cancelled().await;
    }
}
