use axum::{
    body::Body,
    extract::Request,
    http::{StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use colored::{ColoredString, Colorize};
use local_ip_address::local_ip;
use serde_json::json;
use std::{
    io,
    net::{IpAddr, SocketAddr},
    path::Path,
    time::{Duration, Instant},
};
use tokio::{net::TcpSocket, signal};
use tower_http::trace::OnResponse;
use tracing::{Span, debug, info};

use crate::{logging::LatencyColors, server::API_PREFIX};

/// What the startup banner reports.
pub struct ServerSummary<'a> {
    pub addr: SocketAddr,
    pub host: bool,
    pub pages_dir: &'a Path,
    pub static_dir: Option<&'a Path>,
}

/// Terminal hyperlink (OSC 8) showing `url` as its own text.
fn hyperlink(url: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\{url}\x1b]8;;\x1b\\")
}

fn banner_rows(summary: &ServerSummary, network_ip: Option<IpAddr>) -> Vec<(&'static str, ColoredString)> {
    let port = summary.addr.port();
    let api_url = format!("http://localhost:{port}{API_PREFIX}");

    let network = match (summary.host, network_ip) {
        (true, Some(ip)) => hyperlink(&format!("http://{ip}:{port}{API_PREFIX}"))
            .bold()
            .underline()
            .bright_magenta(),
        (true, None) => "Could not determine the local network address".dimmed(),
        (false, _) => "Use --host to expose the server to your network".dimmed(),
    };

    let static_files = match summary.static_dir {
        Some(dir) => dir.display().to_string().normal(),
        None => "none, use --static to serve a directory".dimmed(),
    };

    vec![
        ("API", hyperlink(&api_url).bold().underline().bright_blue()),
        ("Network", network),
        ("Pages", summary.pages_dir.display().to_string().normal()),
        ("Static", static_files),
    ]
}

pub fn log_server_start(start_time: Instant, summary: &ServerSummary) {
    let elapsed = LatencyColors::STARTUP.paint(start_time.elapsed());
    let network_ip = if summary.host { local_ip().ok() } else { None };

    info!(name: "SKIP_FORMAT", "");
    info!(name: "SKIP_FORMAT", "{} docs API ready in {}", "Folio 📖".bold().bright_cyan(), elapsed);
    info!(name: "SKIP_FORMAT", "");
    for (label, value) in banner_rows(summary, network_ip) {
        info!(name: "SKIP_FORMAT", "  {:<8} {}", label.bold(), value);
    }
    info!(name: "SKIP_FORMAT", "");

    info!(name: "server", "{}", "waiting for requests...".dimmed());
}

/// Copy the request URI onto the response so [`RequestLogger`] can print it.
pub async fn record_request_uri(req: Request, next: Next) -> Response {
    let uri = req.uri().clone();
    let mut res = next.run(req).await;
    res.extensions_mut().insert(uri);
    res
}

/// One log line per answered request: status, path and latency.
#[derive(Clone, Debug)]
pub struct RequestLogger;

impl RequestLogger {
    fn line(status: StatusCode, uri: Option<&Uri>, latency: Duration) -> Option<String> {
        if status.is_informational() {
            return None;
        }

        let status = match status {
            s if s.is_server_error() => s.as_str().red(),
            s if s.is_client_error() => s.as_str().yellow(),
            s => s.as_str().green(),
        };
        let path = uri.map(Uri::to_string).unwrap_or_default();

        Some(format!(
            "{} {} {}",
            status,
            path.bold(),
            LatencyColors::REQUEST.paint(latency)
        ))
    }
}

impl OnResponse<Body> for RequestLogger {
    fn on_response(self, response: &Response<Body>, latency: Duration, _span: &Span) {
        if let Some(line) = Self::line(response.status(), response.extensions().get::<Uri>(), latency) {
            info!(name: "", "{}", line);
        }
    }
}

pub async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        axum::Json(json!({ "ok": false, "error": "Not found" })),
    )
}

pub async fn find_open_port(address: &IpAddr, starting_port: u16) -> io::Result<u16> {
    let mut port = starting_port;

    loop {
        let socket = match address {
            IpAddr::V4(_) => TcpSocket::new_v4()?,
            IpAddr::V6(_) => TcpSocket::new_v6()?,
        };
        let socket_addr = SocketAddr::new(*address, port);
        match socket.bind(socket_addr) {
            Ok(_) => {
                debug!("Found open port: {}", port);
                return Ok(port);
            }
            Err(err) => {
                debug!(
                    "Port {} is already in use or failed to bind, trying next one",
                    port
                );
                port = port.checked_add(1).ok_or(err)?;
            }
        }
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            debug!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                debug!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(name: "server", "shutting down");
}
