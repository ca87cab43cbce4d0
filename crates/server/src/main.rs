use std::{
    net::SocketAddr,
    path::{Path as FsPath, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use clap::Parser;
use serde::Deserialize;
use server_api::{list_catalog, load_artifact, select_row, DashboardContext};
use shared::{
    domain::{ArtifactKind, Identifier},
    error::{ApiError, ErrorCode},
    protocol::{ArtifactPayload, CatalogEntry, DisplayState},
};
use storage::Catalog;
use tower_http::services::ServeDir;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Parser, Debug)]
struct Args {
    /// Settings file; defaults to ./dashboard.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[derive(Clone)]
struct AppState {
    dashboard: DashboardContext,
}

#[derive(Debug, Deserialize)]
struct SelectionQuery {
    row: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        settings.server_bind = bind;
    }

    let catalog_source = settings.catalog_source()?;
    let catalog = Catalog::load(&catalog_source).await;
    if catalog.is_empty() {
        warn!(?catalog_source, "catalog is empty; the table will have no rows");
    } else {
        info!(?catalog_source, entries = catalog.len(), "catalog ready");
    }

    let layout = settings.layout();
    info!(
        source_dir = %layout.source_dir.display(),
        processed_dir = %layout.processed_dir.display(),
        summary_dir = %layout.summary_dir.display(),
        "artifact directories"
    );

    let state = AppState {
        dashboard: DashboardContext::new(catalog, layout),
    };
    let app = build_router(Arc::new(state), &settings.assets_dir);

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "dashboard listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, assets_dir: &FsPath) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/catalog", get(http_list_catalog))
        .route("/selection", get(http_select))
        .route("/artifacts/:identifier/:kind", get(http_load_artifact))
        .nest_service("/assets", ServeDir::new(assets_dir))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_catalog(State(state): State<Arc<AppState>>) -> Json<Vec<CatalogEntry>> {
    Json(list_catalog(&state.dashboard))
}

/// A missing, empty or non-numeric row is treated as "nothing selected".
async fn http_select(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SelectionQuery>,
) -> Json<DisplayState> {
    let raw = q.row.as_deref().map(str::trim).filter(|raw| !raw.is_empty());
    let row = match raw {
        Some(raw) => match raw.parse::<usize>() {
            Ok(row) => Some(row),
            Err(_) => {
                warn!(row = raw, "ignoring unparseable selection row");
                None
            }
        },
        None => None,
    };
    Json(select_row(&state.dashboard, row).await)
}

async fn http_load_artifact(
    State(state): State<Arc<AppState>>,
    Path((identifier, kind)): Path<(String, String)>,
) -> Result<Json<ArtifactPayload>, (StatusCode, Json<ApiError>)> {
    let kind = kind
        .parse::<ArtifactKind>()
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiError::from(e))))?;
    let payload = load_artifact(&state.dashboard, &Identifier::new(identifier), kind)
        .await
        .map_err(|e| (status_for(&e.code), Json(e)))?;
    Ok(Json(payload))
}

fn status_for(code: &ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
