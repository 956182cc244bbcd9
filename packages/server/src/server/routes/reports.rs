use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::common::errors::ApiError;
use crate::domains::reports::actions::{self, FileReportInput};
use crate::domains::reports::models::ReportRecord;
use crate::server::app::AppState;
use crate::server::middleware::Identity;

pub async fn create_report(
    State(state): State<AppState>,
    Identity(_actor_email): Identity,
    Json(input): Json<FileReportInput>,
) -> Result<(StatusCode, Json<ReportRecord>), ApiError> {
    let report = actions::file_report(input, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn list_reports(
    State(state): State<AppState>,
    Identity(actor_email): Identity,
) -> Result<Json<Vec<ReportRecord>>, ApiError> {
    let reports = actions::list_reports(&actor_email, &state.deps).await?;
    Ok(Json(reports))
}
