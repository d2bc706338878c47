//! Maiden server library
//!
//! HTTP front end for the norns web editor: the dust REST API over the user
//! data directory, plus static hosting for the app and the lua docs.

pub mod config;
pub mod constants;
pub mod dust;
pub mod error;

use std::any::Any;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{DefaultBodyLimit, Extension, Request};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use maiden_kernel::DustStore;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, error, info, info_span, warn};

pub use config::Config;
pub use error::ApiError;

use constants::{API_NAME, API_ROOT, APP_ROUTE, DOC_ROUTE, DUST_PREFIX, MAX_UPLOAD_BYTES, VERSION};

/// `GET /api/v1` body.
#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub api: &'static str,
    pub version: &'static str,
}

async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        api: API_NAME,
        version: VERSION,
    })
}

async fn redirect_to_app() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, APP_ROUTE)])
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "handler panicked");
    ApiError::Internal("internal server error".to_owned()).into_response()
}

/// Build the full application router.
pub fn router(store: Arc<DustStore>, app_dir: &Path, doc_dir: &Path) -> Router {
    let resource = format!("{DUST_PREFIX}/{{*name}}");

    Router::new()
        .route("/", get(redirect_to_app))
        .route(API_ROOT, get(api_info))
        .route(DUST_PREFIX, get(dust::root_listing))
        .route(&format!("{DUST_PREFIX}/"), get(dust::root_listing))
        .route(
            &resource,
            get(dust::get_resource)
                .put(dust::write_resource)
                .patch(dust::rename_resource)
                .delete(dust::delete_resource),
        )
        .nest_service(APP_ROUTE, ServeDir::new(app_dir))
        .nest_service(DOC_ROUTE, ServeDir::new(doc_dir))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(Extension(store))
}

/// Bind and serve until Ctrl-C or SIGTERM.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    if !config.data_dir.is_dir() {
        warn!(path = %config.data_dir.display(), "data directory does not exist");
    }

    let store = Arc::new(DustStore::new(config.data_dir.clone(), DUST_PREFIX));
    info!(root = %store.root().display(), prefix = DUST_PREFIX, "dust");

    let app = router(store, &config.app_dir, &config.doc_dir);
    let addr = SocketAddr::new(config.bind, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
