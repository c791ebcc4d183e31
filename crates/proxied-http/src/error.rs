//! Construction-time errors for [`crate::ProxiedHttpClient`].
//!
//! Per-request failures use [`transport::HttpClientError`]; this module only
//! covers what can go wrong before the first request is sent.

use thiserror::Error;

/// The client could not be constructed.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The composed proxy URL was rejected by the executor.
    ///
    /// `url` is redacted: credentials are never carried in the error.
    #[error("invalid proxy URL '{url}': {source}")]
    InvalidProxy {
        /// Proxy URL with credentials removed.
        url: String,
        /// Parse failure reported by reqwest.
        #[source]
        source: reqwest::Error,
    },

    /// The underlying reqwest client could not be built (e.g. TLS backend
    /// initialisation failed).
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}
