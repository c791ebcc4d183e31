//! [`reqwest`]-backed implementation of [`HttpClient`].
//!
//! One [`ProxiedHttpClient`] is built per connection. It owns a cookie jar
//! and a reqwest client configured with the proxy URL; every `send` call runs
//! one request through that client and translates the outcome into the
//! [`transport`] contract.
//!
//! # Settlement
//!
//! The in-flight request and the request's abort signal race inside a single
//! `select!`. Whichever completes first decides the outcome and the other is
//! dropped, so a call settles exactly once. Dropping the request future aborts
//! it at the transport level. If both are ready in the same poll the abort
//! wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use tracing::{debug, info_span, Instrument};
use transport::{
    build_proxy_url, parse_retry_after, HttpClient, HttpClientError, HttpMethod, HttpRequest,
    HttpResponse, ProxySettings, ProxyUrl, RequestContent, RequestId, ResponseBody, ResponseType,
    REQUESTED_WITH_VALUE,
};

use crate::error::ClientBuildError;

/// Lower-cased form of [`transport::REQUESTED_WITH_HEADER`].
const REQUESTED_WITH: &str = "x-requested-with";

/// A proxy-aware [`HttpClient`] with its own cookie jar.
///
/// Clones share the connection pool and the cookie jar. Separate instances
/// never share cookies.
#[derive(Debug, Clone)]
pub struct ProxiedHttpClient {
    inner: reqwest::Client,
    cookie_jar: Arc<Jar>,
    proxy_url: Option<ProxyUrl>,
}

impl ProxiedHttpClient {
    /// Builds a client that routes every request through the proxy described
    /// by `settings`.
    ///
    /// When `settings` has no host, proxying is disabled entirely, including
    /// any proxy configured through environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::InvalidProxy`] if reqwest cannot parse the
    /// composed proxy URL, or [`ClientBuildError::Build`] if the client itself
    /// cannot be constructed.
    pub fn new(settings: &ProxySettings) -> Result<Self, ClientBuildError> {
        let proxy_url = build_proxy_url(settings);
        let cookie_jar = Arc::new(Jar::default());

        let builder = reqwest::Client::builder().cookie_provider(Arc::clone(&cookie_jar));
        let builder = match &proxy_url {
            Some(url) => {
                let proxy = reqwest::Proxy::all(url.as_str()).map_err(|source| {
                    ClientBuildError::InvalidProxy {
                        url: url.redacted(),
                        source,
                    }
                })?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };
        let inner = builder.build().map_err(ClientBuildError::Build)?;

        let redacted = proxy_url.as_ref().map(ProxyUrl::redacted);
        debug!(
            proxy = redacted.as_deref().unwrap_or("none"),
            "HTTP client created"
        );

        Ok(Self {
            inner,
            cookie_jar,
            proxy_url,
        })
    }

    /// Builds a client that connects directly, without a proxy.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::Build`] if the client cannot be constructed.
    pub fn direct() -> Result<Self, ClientBuildError> {
        Self::new(&ProxySettings::none())
    }

    /// The proxy URL in use, if any.
    pub fn proxy_url(&self) -> Option<&ProxyUrl> {
        self.proxy_url.as_ref()
    }

    /// The cookie jar shared by this client and its clones.
    pub fn cookie_jar(&self) -> &Arc<Jar> {
        &self.cookie_jar
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, HttpClientError> {
        if request.is_aborted() {
            debug!("abort signalled before dispatch");
            return Err(HttpClientError::Aborted);
        }

        let HttpRequest {
            url,
            method,
            headers,
            content,
            response_type,
            timeout,
            abort_signal,
        } = request;

        let mut builder = self
            .inner
            .request(reqwest_method(method), url)
            .headers(request_headers(&headers)?)
            .body(request_body(content));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        debug!("request dispatched");
        let round_trip = execute(builder, response_type);

        match abort_signal {
            Some(signal) => {
                tokio::select! {
                    biased;
                    () = signal.aborted() => {
                        debug!("abort signalled while in flight");
                        Err(HttpClientError::Aborted)
                    }
                    outcome = round_trip => outcome,
                }
            }
            None => round_trip.await,
        }
    }
}

#[async_trait]
impl HttpClient for ProxiedHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpClientError> {
        let request_id = RequestId::new_random();
        let span = info_span!(
            "http_send",
            %request_id,
            method = %request.method,
            url = strip_query(&request.url),
        );
        self.dispatch(request).instrument(span).await
    }

    fn cookie_string(&self, url: &str) -> String {
        let Ok(url) = reqwest::Url::parse(url) else {
            return String::new();
        };
        self.cookie_jar
            .cookies(&url)
            .and_then(|value| value.to_str().ok().map(str::to_owned))
            .unwrap_or_default()
    }
}

async fn execute(
    builder: reqwest::RequestBuilder,
    response_type: ResponseType,
) -> Result<HttpResponse, HttpClientError> {
    let response = builder.send().await.map_err(classify)?;

    let status = response.status();
    let status_code = status.as_u16();
    let status_text = reason_phrase(&response);

    if !status.is_success() {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_retry_after);
        debug!(status = status_code, ?retry_after, "request failed with HTTP status");
        return Err(HttpClientError::Http {
            status_text,
            status_code,
            retry_after,
        });
    }

    let bytes = response.bytes().await.map_err(classify)?;
    let content = match response_type {
        ResponseType::Binary => ResponseBody::Binary(bytes.to_vec()),
        ResponseType::Text => ResponseBody::Text(String::from_utf8_lossy(&bytes).into_owned()),
    };

    debug!(status = status_code, bytes = content.len(), "request completed");
    Ok(HttpResponse::new(status_code, status_text, content))
}

/// The reason phrase the server sent, falling back to the canonical one for
/// the status code. HTTP/2 responses carry no phrase of their own.
fn reason_phrase(response: &reqwest::Response) -> String {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
        .or_else(|| response.status().canonical_reason())
        .unwrap_or_default()
        .to_owned()
}

fn classify(err: reqwest::Error) -> HttpClientError {
    if err.is_timeout() {
        debug!("request timed out");
        HttpClientError::Timeout
    } else {
        debug!(error = %err, "transport failure");
        HttpClientError::transport(err)
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}

/// The marker header first, then the caller's headers on top of it.
fn request_headers(headers: &BTreeMap<String, String>) -> Result<HeaderMap, HttpClientError> {
    let mut map = HeaderMap::with_capacity(headers.len() + 1);
    map.insert(
        HeaderName::from_static(REQUESTED_WITH),
        HeaderValue::from_static(REQUESTED_WITH_VALUE),
    );

    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(HttpClientError::transport)?;
        let value = HeaderValue::from_str(value).map_err(HttpClientError::transport)?;
        map.insert(name, value);
    }
    Ok(map)
}

fn request_body(content: Option<RequestContent>) -> reqwest::Body {
    match content {
        Some(RequestContent::Binary(bytes)) => bytes.into(),
        Some(RequestContent::Text(text)) => text.into(),
        None => String::new().into(),
    }
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_header_is_always_present() {
        let map = request_headers(&BTreeMap::new()).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[REQUESTED_WITH], "XMLHttpRequest");
    }

    #[test]
    fn caller_headers_are_merged_and_win_on_collision() {
        let headers = BTreeMap::from([
            ("Authorization".to_owned(), "Bearer token".to_owned()),
            ("X-Requested-With".to_owned(), "Custom".to_owned()),
        ]);
        let map = request_headers(&headers).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map["authorization"], "Bearer token");
        assert_eq!(map[REQUESTED_WITH], "Custom");
    }

    #[test]
    fn invalid_header_name_is_a_transport_error() {
        let headers = BTreeMap::from([("bad header".to_owned(), "x".to_owned())]);
        let err = request_headers(&headers).unwrap_err();
        assert!(matches!(err, HttpClientError::Transport { .. }));
    }

    #[test]
    fn invalid_header_value_is_a_transport_error() {
        let headers = BTreeMap::from([("X-Bad".to_owned(), "line\nbreak".to_owned())]);
        let err = request_headers(&headers).unwrap_err();
        assert!(matches!(err, HttpClientError::Transport { .. }));
    }

    #[test]
    fn body_selection() {
        let binary = request_body(Some(RequestContent::Binary(vec![0, 159, 146])));
        assert_eq!(binary.as_bytes(), Some(&[0u8, 159, 146][..]));

        let text = request_body(Some(RequestContent::Text("{}".to_owned())));
        assert_eq!(text.as_bytes(), Some(&b"{}"[..]));

        let absent = request_body(None);
        assert_eq!(absent.as_bytes(), Some(&b""[..]));
    }

    #[test]
    fn query_is_stripped_for_logging() {
        assert_eq!(
            strip_query("http://host/hub?id=abc&access_token=secret"),
            "http://host/hub"
        );
        assert_eq!(strip_query("http://host/hub#frag"), "http://host/hub");
        assert_eq!(strip_query("http://host/hub"), "http://host/hub");
    }

    #[test]
    fn direct_client_has_no_proxy() {
        let client = ProxiedHttpClient::direct().unwrap();
        assert!(client.proxy_url().is_none());
    }

    #[test]
    fn proxy_url_is_kept() {
        let settings = ProxySettings::for_host("127.0.0.1").with_port("8888");
        let client = ProxiedHttpClient::new(&settings).unwrap();
        assert_eq!(
            client.proxy_url().map(ProxyUrl::as_str),
            Some("http://127.0.0.1:8888")
        );
    }

    #[test]
    fn unparseable_proxy_url_fails_construction_without_leaking_credentials() {
        let settings = ProxySettings::for_host("[::1")
            .with_credentials("alice", "s3cret")
            .with_port("80");
        let err = ProxiedHttpClient::new(&settings).unwrap_err();

        match err {
            ClientBuildError::InvalidProxy { url, .. } => {
                assert!(!url.contains("s3cret"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn cookie_string_for_unparseable_url_is_empty() {
        let client = ProxiedHttpClient::direct().unwrap();
        assert_eq!(client.cookie_string("not a url"), "");
    }

    #[test]
    fn cookie_string_reads_the_jar() {
        let client = ProxiedHttpClient::direct().unwrap();
        let url = reqwest::Url::parse("http://hub.local/").unwrap();
        client.cookie_jar().add_cookie_str("affinity=abc; Path=/", &url);

        assert_eq!(client.cookie_string("http://hub.local/negotiate"), "affinity=abc");
        assert_eq!(client.cookie_string("http://other.local/"), "");
    }
}
