//! Command-line and environment configuration.
//!
//! Proxy settings are layered: an optional JSON file first, then any
//! `--proxy-*` flag or `PROXY_*` environment variable on top of it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, Parser, ValueEnum};
use transport::{HttpMethod, HttpRequest, ProxySettings, ResponseType};

/// Sends one request through the proxy-aware HTTP client.
#[derive(Debug, Parser)]
#[command(name = "proxied-probe", version, about)]
pub struct Arguments {
    /// Target URL.
    #[arg(long)]
    pub url: String,

    /// HTTP method.
    #[arg(long, default_value = "GET")]
    pub method: HttpMethod,

    /// Extra request header, `NAME:VALUE`. May be repeated.
    #[arg(long = "header", value_name = "NAME:VALUE")]
    pub headers: Vec<String>,

    /// Text request body.
    #[arg(long)]
    pub data: Option<String>,

    /// Ask for the response body as raw bytes.
    #[arg(long)]
    pub binary: bool,

    /// Request timeout in milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    #[command(flatten)]
    pub proxy: ProxyArgs,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Human)]
    pub log_format: LogFormat,

    /// OTLP gRPC endpoint to export spans to.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

/// Proxy options; each one may also come from the environment.
#[derive(Debug, Default, Args)]
pub struct ProxyArgs {
    /// JSON file holding proxy settings (`{"host": ..., "port": ...}`).
    #[arg(long = "proxy-config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Proxy scheme prefix, e.g. `http://`.
    #[arg(long = "proxy-protocol", env = "PROXY_PROTOCOL")]
    pub protocol: Option<String>,

    /// Proxy user name.
    #[arg(long = "proxy-user", env = "PROXY_USER")]
    pub user: Option<String>,

    /// Proxy password.
    #[arg(long = "proxy-password", env = "PROXY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Proxy host. Without it no proxy is used.
    #[arg(long = "proxy-host", env = "PROXY_HOST")]
    pub host: Option<String>,

    /// Proxy port.
    #[arg(long = "proxy-port", env = "PROXY_PORT")]
    pub port: Option<String>,
}

/// Formatter used for log output on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Human,
    /// One JSON object per event.
    Json,
}

impl ProxyArgs {
    /// Resolves the effective proxy settings.
    ///
    /// # Errors
    ///
    /// Fails if the config file cannot be read or is not valid JSON.
    pub fn resolve(&self) -> anyhow::Result<ProxySettings> {
        let base = match &self.config {
            Some(path) => load_settings_file(path)?,
            None => ProxySettings::none(),
        };
        Ok(base.merged_with(self.overrides()))
    }

    fn overrides(&self) -> ProxySettings {
        ProxySettings {
            protocol: self.protocol.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            host: self.host.clone(),
            port: self.port.clone(),
        }
    }
}

impl Arguments {
    /// Builds the request described by the arguments.
    ///
    /// # Errors
    ///
    /// Fails if a `--header` value is not of the form `NAME:VALUE`.
    pub fn request(&self) -> anyhow::Result<HttpRequest> {
        let mut request = HttpRequest::new(self.method, self.url.clone());
        for header in &self.headers {
            let (name, value) = parse_header(header)?;
            request = request.with_header(name, value);
        }
        if let Some(data) = &self.data {
            request = request.with_content(data.as_str());
        }
        if self.binary {
            request = request.with_response_type(ResponseType::Binary);
        }
        if let Some(ms) = self.timeout_ms {
            request = request.with_timeout(Duration::from_millis(ms));
        }
        Ok(request)
    }
}

fn load_settings_file(path: &Path) -> anyhow::Result<ProxySettings> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read proxy config {}", path.display()))?;
    parse_settings(&raw).with_context(|| format!("invalid proxy config {}", path.display()))
}

fn parse_settings(raw: &str) -> anyhow::Result<ProxySettings> {
    Ok(serde_json::from_str(raw)?)
}

fn parse_header(raw: &str) -> anyhow::Result<(&str, &str)> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => bail!("header '{raw}' is not of the form NAME:VALUE"),
    }
}
