//! Proxy settings and the proxy URL builder.
//!
//! [`ProxySettings`] mirrors the options object a caller hands to the adapter:
//! every field is optional, and the absence of a host disables proxying
//! altogether. [`build_proxy_url`] turns the settings into the single URL the
//! executor is configured with.
//!
//! Empty strings are treated exactly like absent values.

use serde::{Deserialize, Serialize};

use crate::ProxyUrl;

/// Scheme used when [`ProxySettings::protocol`] is not set.
pub const DEFAULT_PROXY_PROTOCOL: &str = "http://";

/// Settings describing an intermediary HTTP proxy.
///
/// Deserialises from the camelCase options object used by the connection
/// framework (`{"protocol": "http://", "host": "127.0.0.1", "port": "8888"}`).
///
/// Nothing here is validated. Settings whose composed URL the executor cannot
/// parse, such as a host of `"[::1"`, are rejected when the client is built
/// (`ProxiedHttpClient::new` returns `ClientBuildError::InvalidProxy`), not
/// deferred to the first request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxySettings {
    /// Scheme prefix including the separator, e.g. `"http://"` or `"https://"`.
    pub protocol: Option<String>,

    /// Proxy user name.
    pub user: Option<String>,

    /// Proxy password.
    pub password: Option<String>,

    /// Proxy host. When absent no proxy is used, whatever the other fields say.
    pub host: Option<String>,

    /// Proxy port, kept as text and passed through unvalidated.
    pub port: Option<String>,
}

impl ProxySettings {
    /// Settings that disable proxying.
    pub fn none() -> Self {
        Self::default()
    }

    /// Settings for an unauthenticated proxy at `host`.
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Self::default()
        }
    }

    /// Builder-style setter for the port.
    #[must_use]
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Builder-style setter for the scheme prefix.
    #[must_use]
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Builder-style setter for both credential halves.
    #[must_use]
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    /// Returns `true` if a host is configured.
    pub fn is_enabled(&self) -> bool {
        present(&self.host).is_some()
    }

    /// Layers `overrides` on top of `self`, field by field.
    ///
    /// A non-empty field in `overrides` replaces the corresponding field here;
    /// absent or empty fields leave the base value untouched.
    #[must_use]
    pub fn merged_with(self, overrides: ProxySettings) -> Self {
        fn pick(base: Option<String>, over: Option<String>) -> Option<String> {
            match over {
                Some(v) if !v.is_empty() => Some(v),
                _ => base,
            }
        }

        Self {
            protocol: pick(self.protocol, overrides.protocol),
            user: pick(self.user, overrides.user),
            password: pick(self.password, overrides.password),
            host: pick(self.host, overrides.host),
            port: pick(self.port, overrides.port),
        }
    }

    /// Shorthand for [`build_proxy_url`].
    pub fn proxy_url(&self) -> Option<ProxyUrl> {
        build_proxy_url(self)
    }
}

/// Composes the proxy URL for `settings`, or `None` if no host is configured.
///
/// The result is `<protocol or "http://">[<user>:<password>@]<host>[:<port>]`.
/// The credentials segment is included when either half is present, with an
/// empty string standing in for the missing one. Nothing is validated.
///
/// A `Some` result is not guaranteed to be a usable URL: the HTTP client
/// parses it at construction time and fails there if it is malformed.
pub fn build_proxy_url(settings: &ProxySettings) -> Option<ProxyUrl> {
    let host = present(&settings.host)?;

    let mut url = String::from(present(&settings.protocol).unwrap_or(DEFAULT_PROXY_PROTOCOL));

    let user = present(&settings.user);
    let password = present(&settings.password);
    if user.is_some() || password.is_some() {
        url.push_str(user.unwrap_or(""));
        url.push(':');
        url.push_str(password.unwrap_or(""));
        url.push('@');
    }

    url.push_str(host);
    if let Some(port) = present(&settings.port) {
        url.push(':');
        url.push_str(port);
    }

    ProxyUrl::new(url)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
