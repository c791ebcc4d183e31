//! Abstract request and response values exchanged with an [`crate::HttpClient`].
//!
//! These types describe *what* to send and what came back; they say nothing
//! about proxies, cookie jars, or the library that performs the I/O.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::AbortSignal;

/// Header added to every outgoing request so that authentication middleware
/// answers with a plain 401 instead of redirecting to a login page.
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";

/// Value sent with [`REQUESTED_WITH_HEADER`].
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

// ---------------------------------------------------------------------------
// Request side
// ---------------------------------------------------------------------------

/// HTTP method of an [`HttpRequest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    #[default]
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(UnknownMethod(s.to_owned())),
        }
    }
}

/// Returned when parsing an [`HttpMethod`] from an unrecognised name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);

/// Payload of an outgoing request, chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestContent {
    /// Text payload, sent as-is.
    Text(String),
    /// Binary payload, sent as raw bytes.
    Binary(Vec<u8>),
}

impl From<String> for RequestContent {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for RequestContent {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<Vec<u8>> for RequestContent {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

/// How the response body should be delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Decode the body as UTF-8 text.
    #[default]
    Text,
    /// Hand back the raw bytes.
    Binary,
}

/// An abstract HTTP request, supplied per call and not retained by the client.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    /// Absolute target URL.
    pub url: String,

    /// HTTP method.
    pub method: HttpMethod,

    /// Request headers. Keys are unique; the client adds
    /// [`REQUESTED_WITH_HEADER`] unless one is given here.
    pub headers: BTreeMap<String, String>,

    /// Request body. `None` is sent as an empty body.
    pub content: Option<RequestContent>,

    /// Expected response body representation.
    pub response_type: ResponseType,

    /// Upper bound for the whole round trip. `None` means no limit.
    pub timeout: Option<Duration>,

    /// Cancels the request when fired.
    pub abort_signal: Option<AbortSignal>,
}

impl HttpRequest {
    /// Creates a request with no headers, body, timeout or abort signal.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            ..Self::default()
        }
    }

    /// Adds or replaces a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<RequestContent>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the response representation.
    #[must_use]
    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Sets the round-trip timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attaches an abort signal.
    #[must_use]
    pub fn with_abort_signal(mut self, signal: AbortSignal) -> Self {
        self.abort_signal = Some(signal);
        self
    }

    /// Returns `true` if an attached abort signal has already fired.
    pub fn is_aborted(&self) -> bool {
        self.abort_signal.as_ref().is_some_and(AbortSignal::is_aborted)
    }
}

// ---------------------------------------------------------------------------
// Response side
// ---------------------------------------------------------------------------

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// Body decoded as UTF-8 text.
    Text(String),
    /// Raw body bytes.
    Binary(Vec<u8>),
}

impl ResponseBody {
    /// Returns the text body, or `None` for a binary body.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    /// Returns the binary body, or `None` for a text body.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Text(_) => None,
            Self::Binary(bytes) => Some(bytes),
        }
    }

    /// Length of the body in bytes.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(bytes) => bytes.len(),
        }
    }

    /// Returns `true` if the body is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code.
    pub status_code: u16,

    /// Reason phrase; empty when none is known.
    pub status_text: String,

    /// Response body in the representation the request asked for.
    pub content: ResponseBody,
}

impl HttpResponse {
    /// Creates a response value.
    pub fn new(status_code: u16, status_text: impl Into<String>, content: ResponseBody) -> Self {
        Self {
            status_code,
            status_text: status_text.into(),
            content,
        }
    }
}
