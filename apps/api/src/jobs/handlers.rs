use axum::{
    extract::{Path, State},
    Json,
};

use crate::applications::models::ApplicationResult;
use crate::errors::AppError;
use crate::jobs::catalog::{AtsListings, CatalogOverview};
use crate::jobs::form::{into_application, ApplicationForm};
use crate::state::AppState;

/// GET /api/v1/jobs
pub async fn handle_catalog_overview(State(state): State<AppState>) -> Json<CatalogOverview> {
    Json(state.catalog.overview())
}

/// GET /api/v1/jobs/:platform
pub async fn handle_platform_jobs(
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> Result<Json<AtsListings>, AppError> {
    state
        .catalog
        .platform(&platform)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No job listings for platform '{platform}'")))
}

/// POST /api/v1/jobs/:platform/:job_id/apply
///
/// Validates the form against the listed job, then submits it like any other application.
pub async fn handle_apply(
    State(state): State<AppState>,
    Path((platform, job_id)): Path<(String, String)>,
    Json(form): Json<ApplicationForm>,
) -> Result<Json<ApplicationResult>, AppError> {
    let job = state
        .catalog
        .job(&platform, &job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found on '{platform}'")))?;

    let fields =
        into_application(form, job).map_err(|errors| AppError::Validation(errors.join("; ")))?;

    let result = state
        .dispatcher
        .create_application(&platform, &fields)
        .await?;
    Ok(Json(result))
}
