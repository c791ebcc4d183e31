//! Proxy-aware HTTP client adapter.
//!
//! Implements the [`transport::HttpClient`] trait on top of [`reqwest`], so a
//! real-time connection client can send its negotiate, long-polling and SSE
//! requests through an HTTP/HTTPS proxy while keeping cookie-based session
//! affinity.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Proxy wiring, the cookie jar, header and body
//! translation, and the mapping of reqwest failures onto
//! [`transport::HttpClientError`] all live here. Callers see only the
//! [`transport::HttpClient`] trait.
//!
//! ## Example
//!
//! ```no_run
//! use proxied_http::ProxiedHttpClient;
//! use transport::{HttpClient, ProxySettings};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ProxySettings::for_host("127.0.0.1").with_port("8888");
//! let client = ProxiedHttpClient::new(&settings)?;
//!
//! let response = client.get("http://localhost:5000/loghub/negotiate").await?;
//! println!("{} {}", response.status_code, response.status_text);
//! println!("cookies: {}", client.cookie_string("http://localhost:5000/"));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;

pub use client::ProxiedHttpClient;
pub use error::ClientBuildError;
