use std::{net::SocketAddr, path::Path, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use corpus::Corpus;
use server_api::{ApiContext, SearchParams};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{EXISTING_PARAM, HEALTHZ_ROUTE, QUERY_PARAM, SEARCH_ROUTE},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings()?;
    let corpus = Corpus::load(&settings.corpus_path)
        .with_context(|| format!("failed to load corpus '{}'", settings.corpus_path.display()))?
        .with_window(settings.result_window);

    let api = ApiContext {
        corpus,
        max_new_results: settings.max_new_results,
    };
    let static_dir = settings.static_dir.is_dir().then_some(settings.static_dir.as_path());
    if static_dir.is_none() {
        warn!(static_dir = %settings.static_dir.display(), "static directory missing; serving API only");
    }
    let app = build_router(Arc::new(AppState { api }), static_dir);

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "shakesearch available at http://localhost:{}...", settings.port());
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route(HEALTHZ_ROUTE, get(healthz))
        .route(SEARCH_ROUTE, get(http_search))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };
    router.layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_search(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<String>>, (StatusCode, Json<ApiError>)> {
    let params = SearchParams {
        q: first_value(&pairs, QUERY_PARAM),
        existing: first_value(&pairs, EXISTING_PARAM),
    };
    let results = server_api::search(&state.api, params).await.map_err(|e| {
        if e.code == ErrorCode::Internal {
            warn!(error = %e.message, "search failed");
        }
        (status_for(e.code), Json(e))
    })?;
    Ok(Json(results))
}

/// Repeated parameters resolve to their first occurrence.
fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
