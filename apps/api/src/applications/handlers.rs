use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::applications::models::{ApplicationFields, ApplicationResult, BulkResult};
use crate::errors::AppError;
use crate::platforms::PlatformSummary;
use crate::state::AppState;

/// GET /api/v1/platforms
pub async fn handle_list_platforms(State(state): State<AppState>) -> Json<Vec<PlatformSummary>> {
    Json(state.dispatcher.registry().summaries())
}

/// POST /api/v1/platforms/:platform/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Json(fields): Json<ApplicationFields>,
) -> Result<Json<ApplicationResult>, AppError> {
    let result = state.dispatcher.create_application(&platform, &fields).await?;
    Ok(Json(result))
}

/// POST /api/v1/applications/bulk
///
/// One result per record, in request order. Individual failures, malformed records
/// included, are reported inline.
pub async fn handle_bulk_create(
    State(state): State<AppState>,
    Json(records): Json<Vec<Value>>,
) -> Json<Vec<BulkResult>> {
    Json(state.dispatcher.bulk_create(records).await)
}
