//! `proxied-probe` entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse configuration**: command-line flags, `PROXY_*` environment
//!    variables and an optional JSON proxy settings file.
//! 2. **Wire observability**: `tracing-subscriber` with a human or JSON
//!    formatter and, when an endpoint is given, an OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure**: one [`ProxiedHttpClient`] for the run.
//! 4. **Probe**: send one request, print the status line and body to stdout,
//!    then the cookie string the client now holds for the target URL.
//!
//! Ctrl-C aborts the in-flight request.

mod config;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use proxied_http::ProxiedHttpClient;
use transport::{AbortController, HttpClient, HttpResponse, ProxyUrl, ResponseBody};

use crate::config::Arguments;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Arguments::parse();
    let _telemetry = telemetry::init(args.log_format, args.otlp_endpoint.as_deref())?;

    let settings = args.proxy.resolve()?;
    let client = ProxiedHttpClient::new(&settings).context("failed to build HTTP client")?;

    let controller = AbortController::new();
    {
        let controller = controller.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Ctrl+C, aborting request");
                controller.abort();
            }
        });
    }

    let request = args.request()?.with_abort_signal(controller.signal());
    let proxy = client.proxy_url().map(ProxyUrl::redacted);
    tracing::info!(
        url = %args.url,
        method = %args.method,
        proxy = proxy.as_deref().unwrap_or("none"),
        "sending probe request"
    );

    let outcome = client.send(request).await;
    let cookies = client.cookie_string(&args.url);

    let response = outcome.with_context(|| format!("{} {} failed", args.method, args.url))?;
    print_response(&response);
    println!("cookies: {cookies}");

    Ok(())
}

fn print_response(response: &HttpResponse) {
    println!("{} {}", response.status_code, response.status_text);
    match &response.content {
        ResponseBody::Text(text) => println!("{text}"),
        ResponseBody::Binary(bytes) => println!("<{} bytes>", bytes.len()),
    }
}
