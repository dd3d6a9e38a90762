use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
    time::Instant,
};

use axum::{
    Json, Router,
    extract::{Query, State},
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use folio::{DocsService, PageLookup};
use serde::Deserialize;
use serde_json::json;
use tokio::{net::TcpSocket, task::JoinError};
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::{Level, debug, error};

use crate::server_utils::{
    RequestLogger, ServerSummary, find_open_port, handle_404, log_server_start, record_request_uri,
    shutdown_signal,
};

pub const API_PREFIX: &str = "/api/docs";

pub struct ServerOptions {
    pub static_dir: Option<PathBuf>,
    pub port: u16,
    pub host: bool,
}

#[derive(Clone)]
struct AppState {
    docs: Arc<DocsService>,
}

#[derive(Deserialize)]
struct PageQuery {
    href: Option<String>,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

pub fn router(docs: Arc<DocsService>, static_dir: Option<PathBuf>) -> Router {
    let api = Router::new()
        .route("/config", get(get_config))
        .route("/page", get(get_page))
        .route("/search", get(get_search))
        .with_state(AppState { docs });

    let router = Router::new().nest(API_PREFIX, api);

    let router = match static_dir {
        Some(static_dir) => {
            router.fallback_service(ServeDir::new(static_dir).not_found_service(handle_404.into_service()))
        }
        None => router.fallback(handle_404),
    };

    router
        .layer(middleware::from_fn(record_request_uri))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(RequestLogger),
        )
}

pub async fn start_docs_server(docs: DocsService, options: ServerOptions) -> std::io::Result<()> {
    let start_time = Instant::now();

    // --host binds on every interface, otherwise localhost only
    let addr = if options.host {
        IpAddr::from([0, 0, 0, 0])
    } else {
        IpAddr::from([127, 0, 0, 1])
    };

    let port = find_open_port(&addr, options.port).await?;
    let socket = TcpSocket::new_v4()?;
    let _ = socket.set_reuseaddr(true);

    let socket_addr = SocketAddr::new(addr, port);
    socket.bind(socket_addr)?;

    let listener = socket.listen(1024)?;
    let local_addr = listener.local_addr()?;

    debug!("listening on {}", local_addr);

    let docs = Arc::new(docs);
    log_server_start(
        start_time,
        &ServerSummary {
            addr: local_addr,
            host: options.host,
            pages_dir: docs.repository().pages_dir(),
            static_dir: options.static_dir.as_deref(),
        },
    );

    let router = router(docs, options.static_dir);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn get_config(State(state): State<AppState>) -> Response {
    match run_blocking(&state, |docs| docs.config()).await {
        Ok(config) => Json(json!({ "ok": true, "data": config })).into_response(),
        Err(err) => internal_error(err),
    }
}

async fn get_page(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Response {
    let Some(href) = query.href else {
        // Without an href this answers like /config does, under a different key.
        return match run_blocking(&state, |docs| docs.config()).await {
            Ok(config) => Json(json!({ "ok": true, "config": config })).into_response(),
            Err(err) => internal_error(err),
        };
    };

    match run_blocking(&state, move |docs| docs.page(&href)).await {
        Ok(PageLookup::Page(page) | PageLookup::Homepage(page)) => {
            Json(json!({ "ok": true, "page": page })).into_response()
        }
        Ok(PageLookup::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "ok": false, "error": "Page not found" })),
        )
            .into_response(),
        Err(err) => internal_error(err),
    }
}

async fn get_search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    match run_blocking(&state, move |docs| docs.search(&query.q)).await {
        Ok(results) => Json(json!({ "ok": true, "results": results })).into_response(),
        Err(err) => internal_error(err),
    }
}

/// Every operation reads files, keep them off the async workers.
async fn run_blocking<T, F>(state: &AppState, f: F) -> Result<T, JoinError>
where
    T: Send + 'static,
    F: FnOnce(&DocsService) -> T + Send + 'static,
{
    let docs = Arc::clone(&state.docs);
    tokio::task::spawn_blocking(move || f(&docs)).await
}

fn internal_error(err: JoinError) -> Response {
    error!("Request handler failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "ok": false, "error": "Internal server error" })),
    )
        .into_response()
}
