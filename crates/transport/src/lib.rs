//! Abstract HTTP transport domain.
//!
//! This crate describes the HTTP capability a real-time connection client
//! plugs into: the request and response values, the failure taxonomy, proxy
//! settings, cooperative cancellation, and the [`HttpClient`] port trait.
//! Infrastructure crates implement the trait; they never add rules here.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** No network I/O happens in this crate.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`client`] | The [`HttpClient`] port trait |
//! | [`types`] | Request/response values (`HttpRequest`, `HttpResponse`, ...) |
//! | [`errors`] | [`HttpClientError`] and [`RetryPolicy`] |
//! | [`proxy`] | [`ProxySettings`] and [`build_proxy_url`] |
//! | [`abort`] | [`AbortController`] / [`AbortSignal`] |
//! | [`identifiers`] | Newtypes (`ProxyUrl`, `RequestId`) |

pub mod abort;
pub mod client;
pub mod errors;
pub mod identifiers;
pub mod proxy;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use abort::{AbortController, AbortSignal};
pub use client::HttpClient;
pub use errors::{parse_retry_after, BoxError, HttpClientError, RetryPolicy};
pub use identifiers::{ProxyUrl, RequestId};
pub use proxy::{build_proxy_url, ProxySettings, DEFAULT_PROXY_PROTOCOL};
pub use types::{
    HttpMethod, HttpRequest, HttpResponse, RequestContent, ResponseBody, ResponseType,
    UnknownMethod, REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE,
};
