use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::common::entity_ids::LessonId;
use crate::common::errors::ApiError;
use crate::domains::lessons::actions;
use crate::domains::lessons::discovery::TopContributor;
use crate::domains::lessons::models::LessonRecord;
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct TopContributorsQuery {
    pub window_days: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RelatedQuery {
    pub limit: Option<i64>,
}

pub async fn top_contributors(
    State(state): State<AppState>,
    Query(query): Query<TopContributorsQuery>,
) -> Result<Json<Vec<TopContributor>>, ApiError> {
    let contributors =
        actions::top_contributors(query.window_days, query.limit, &state.deps).await?;
    Ok(Json(contributors))
}

pub async fn related_lessons(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<RelatedQuery>,
) -> Result<Json<Vec<LessonRecord>>, ApiError> {
    let id =
        LessonId::parse(&id).map_err(|_| ApiError::validation("lesson id is not a valid id"))?;
    let lessons = actions::related_lessons(id, query.limit, &state.deps).await?;
    Ok(Json(lessons))
}
