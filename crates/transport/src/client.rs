//! The HTTP client port.
//!
//! A real-time connection needs exactly two things from its HTTP layer: a way
//! to perform one request, and a way to read back the cookies that previous
//! responses left behind (so a WebSocket or SSE upgrade can carry the same
//! session). [`HttpClient`] is that contract; infrastructure crates supply the
//! implementation.

use async_trait::async_trait;

use crate::{HttpClientError, HttpMethod, HttpRequest, HttpResponse};

/// Abstract HTTP client capability.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Performs `request` and settles exactly once.
    ///
    /// # Errors
    ///
    /// - [`HttpClientError::Aborted`] if the request's abort signal fired
    ///   before or during the call.
    /// - [`HttpClientError::Timeout`] if the request's timeout elapsed.
    /// - [`HttpClientError::Transport`] for any other transport failure.
    /// - [`HttpClientError::Http`] for a non-2xx status.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpClientError>;

    /// Returns the `Cookie` header value that applies to `url`, or an empty
    /// string if there is none.
    fn cookie_string(&self, url: &str) -> String;

    /// Issues a `GET` to `url`.
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpClientError> {
        self.send(HttpRequest::new(HttpMethod::Get, url)).await
    }

    /// Issues a `POST` to `url`, keeping every other field of `options`.
    async fn post(&self, url: &str, options: HttpRequest) -> Result<HttpResponse, HttpClientError> {
        self.send(HttpRequest {
            url: url.to_owned(),
            method: HttpMethod::Post,
            ..options
        })
        .await
    }

    /// Issues a `DELETE` to `url`, keeping every other field of `options`.
    async fn delete(&self, url: &str, options: HttpRequest) -> Result<HttpResponse, HttpClientError> {
        self.send(HttpRequest {
            url: url.to_owned(),
            method: HttpMethod::Delete,
            ..options
        })
        .await
    }
}
