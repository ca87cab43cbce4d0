use std::sync::Arc;

use shared::{
    domain::{ArtifactKind, Identifier},
    error::{ApiError, ErrorCode},
    protocol::{ArtifactPayload, CatalogEntry, DisplayState, Selection},
};
use storage::{ArtifactLayout, Catalog};
use tracing::{debug, warn};

/// Immutable state shared by every request: built once at startup.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub catalog: Arc<Catalog>,
    pub layout: ArtifactLayout,
}

impl DashboardContext {
    pub fn new(catalog: Catalog, layout: ArtifactLayout) -> Self {
        Self {
            catalog: Arc::new(catalog),
            layout,
        }
    }
}

pub fn list_catalog(ctx: &DashboardContext) -> Vec<CatalogEntry> {
    ctx.catalog
        .iter()
        .enumerate()
        .map(|(row, identifier)| CatalogEntry {
            row,
            identifier: identifier.clone(),
        })
        .collect()
}

/// Maps a table selection to the three display regions.
///
/// No row, or a row outside the catalog, yields the idle placeholders. The
/// three reads are independent and run concurrently; a failure in one never
/// affects the others.
pub async fn select_row(ctx: &DashboardContext, row: Option<usize>) -> DisplayState {
    let Some(row) = row else {
        return DisplayState::idle();
    };
    let Some(identifier) = ctx.catalog.get(row) else {
        warn!(row, catalog_len = ctx.catalog.len(), "selected row is outside the catalog");
        return DisplayState::idle();
    };

    let (source, processed, summary) = tokio::join!(
        ctx.layout.read(identifier, ArtifactKind::Source),
        ctx.layout.read(identifier, ArtifactKind::Processed),
        ctx.layout.read(identifier, ArtifactKind::Summary),
    );
    debug!(
        row,
        %identifier,
        source_found = source.is_content(),
        processed_found = processed.is_content(),
        summary_found = summary.is_content(),
        "loaded selection"
    );

    DisplayState {
        selection: Some(Selection {
            row,
            identifier: identifier.clone(),
        }),
        source: source.into_display_text(),
        processed: processed.into_display_text(),
        summary: summary.into_display_text(),
    }
}

/// Reads a single artifact. Only catalog identifiers are resolved, so request
/// input never reaches the filesystem as a path fragment.
pub async fn load_artifact(
    ctx: &DashboardContext,
    identifier: &Identifier,
    kind: ArtifactKind,
) -> Result<ArtifactPayload, ApiError> {
    if !ctx.catalog.contains(identifier) {
        return Err(ApiError::new(
            ErrorCode::NotFound,
            format!("'{identifier}' is not in the catalog"),
        ));
    }

    let path = ctx.layout.resolve(identifier, kind);
    let outcome = storage::read_artifact(&path).await;
    Ok(ArtifactPayload {
        identifier: identifier.clone(),
        kind,
        path,
        outcome,
    })
}

/// Selection state for a single UI session.
///
/// Starts idle. A selected row moves it to displaying; later selections
/// replace all three regions together. An empty selection event never clears
/// an existing display, while a row outside the catalog falls back to the
/// idle placeholders.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    ctx: DashboardContext,
    state: DisplayState,
}

impl DashboardSession {
    pub fn new(ctx: DashboardContext) -> Self {
        Self {
            ctx,
            state: DisplayState::idle(),
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub async fn select(&mut self, row: Option<usize>) -> &DisplayState {
        if row.is_some() || self.state.is_idle() {
            self.state = select_row(&self.ctx, row).await;
        }
        &self.state
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
