//! Error and retry-policy types surfaced by [`crate::HttpClient`] implementations.
//!
//! [`HttpClientError`] is the full taxonomy a caller can observe from `send`.
//! Clients translate failures into it and never retry or recover on their own;
//! [`RetryPolicy`] lets the caller decide what to do next.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed source error carried by [`HttpClientError::Transport`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means retry
        /// immediately or apply the caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation should not be retried as-is.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Client errors
// ---------------------------------------------------------------------------

/// Failure of a single `send` call.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The request's abort signal fired, before or during the call.
    #[error("the operation was aborted")]
    Aborted,

    /// The executor gave up waiting for the server.
    #[error("the operation timed out")]
    Timeout,

    /// Any other transport-level failure: DNS, refused connection, TLS,
    /// unreachable proxy, or a request the executor could not build.
    #[error("transport error: {message}")]
    Transport {
        /// Description of the underlying failure.
        message: String,
        /// The underlying error.
        #[source]
        source: BoxError,
    },

    /// The round trip completed but the status was outside `200..300`.
    #[error("HTTP error {status_code}: {status_text}")]
    Http {
        /// Reason phrase; empty when none is known.
        status_text: String,
        /// Numeric status code.
        status_code: u16,
        /// Delay requested by the server's `Retry-After` header, if any.
        retry_after: Option<Duration>,
    },
}

impl HttpClientError {
    /// Wraps an executor error, keeping its description.
    pub fn transport(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self::Transport {
            message: source.to_string(),
            source,
        }
    }

    /// Returns the status code for [`HttpClientError::Http`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Classifies this error for callers that implement their own retries.
    ///
    /// Timeouts, transport failures, 408, 429 and 5xx are retryable; aborts
    /// and every other status are not. A retryable status carries the
    /// server's `Retry-After` delay when one was sent.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Aborted => RetryPolicy::NonRetryable,
            Self::Timeout | Self::Transport { .. } => RetryPolicy::Retryable { after: None },
            Self::Http {
                status_code,
                retry_after,
                ..
            } => match status_code {
                408 | 429 | 500..=599 => RetryPolicy::Retryable { after: *retry_after },
                _ => RetryPolicy::NonRetryable,
            },
        }
    }
}

/// Parses a `Retry-After` header value given in delta-seconds.
///
/// The HTTP-date form is not supported and yields `None`.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
