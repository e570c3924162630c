//! Serve command implementation: resolves pages on demand.

use super::page::{render_not_found, render_page};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use devdocs_core::{ResolveError, Site, SiteConfig};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
struct AppState {
    inner: Arc<ServeState>,
}

struct ServeState {
    config: SiteConfig,
    site: Site,
    /// Corpus snapshot taken at startup. The core itself never caches;
    /// holding one here is this layer's choice and lasts one server run.
    search_index: String,
}

/// Start the site server. Pages resolve from disk per request, so content
/// edits show up on reload without a rebuild.
pub async fn serve_site(config_path: &Path, port: Option<u16>) -> Result<()> {
    let config = SiteConfig::from_file(config_path).context("Failed to load configuration")?;
    let port = port.unwrap_or(config.server.port);
    let site = Site::new(config.clone());

    let search_index = serde_json::to_string(&site.build_search_corpus())
        .context("Failed to serialize search index")?;

    let state = AppState {
        inner: Arc::new(ServeState {
            config,
            site,
            search_index,
        }),
    };

    tracing::info!("Serving on http://127.0.0.1:{}", port);

    let app = Router::new()
        .route("/", get(serve_root))
        .route("/search-index.json", get(serve_search_index))
        .route("/{*path}", get(serve_page))
        .with_state(state);

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

async fn serve_root(State(state): State<AppState>) -> Response {
    respond_with_page(state, "index".to_string()).await
}

async fn serve_page(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path().trim_matches('/').to_string();
    respond_with_page(state, path).await
}

async fn serve_search_index(State(state): State<AppState>) -> Response {
    if !state.inner.config.search.enabled {
        return (StatusCode::NOT_FOUND, "Search is disabled").into_response();
    }
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        state.inner.search_index.clone(),
    )
        .into_response()
}

async fn respond_with_page(state: AppState, path: String) -> Response {
    // Resolution reads the filesystem; keep it off the async executor.
    let result = tokio::task::spawn_blocking(move || -> Result<(StatusCode, String)> {
        let inner = &state.inner;
        match inner.site.resolve(&path) {
            Ok(doc) => Ok((StatusCode::OK, render_page(&inner.config, &doc)?)),
            Err(ResolveError::NotFound(slug)) => {
                tracing::debug!("404 for '{}'", slug);
                Ok((
                    StatusCode::NOT_FOUND,
                    render_not_found(&inner.config, &path)?,
                ))
            }
        }
    })
    .await;

    match result {
        Ok(Ok((status, html))) => (status, Html(html)).into_response(),
        Ok(Err(err)) => {
            tracing::error!("Render failed: {:#}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Render failed").into_response()
        }
        Err(err) => {
            tracing::error!("Task join error: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}
