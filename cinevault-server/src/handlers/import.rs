use axum::{Json, extract::State};
use cinevault_model::ImportRequest;
use serde_json::{Value, json};
use tracing::info;

use crate::errors::AppResult;
use crate::infra::app_state::AppState;

/// Run one import batch to completion and return the full report. The call
/// blocks until every identifier has been processed; per-item failures are
/// inside the report, not surfaced as an HTTP error.
pub async fn import_handler(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> AppResult<Json<Value>> {
    info!(
        allow_mkv = request.allow_mkv,
        dry_run = request.dry_run,
        items = request.items.as_ref().map(Vec::len),
        identifiers = request.identifiers.as_ref().map(Vec::len),
        "import batch requested"
    );

    let report = state.import.run(&request).await?;

    Ok(Json(json!({
        "success": true,
        "summary": report.summary,
        "results": report.results,
    })))
}
