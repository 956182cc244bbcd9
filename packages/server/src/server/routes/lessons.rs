use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::common::entity_ids::LessonId;
use crate::common::errors::ApiError;
use crate::common::pagination::{Page, PageArgs};
use crate::domains::lessons::actions::{self, CreateLessonInput, ReactionInput, ReactionResponse};
use crate::domains::lessons::models::{LessonFilter, LessonRecord, LessonSort};
use crate::server::app::AppState;
use crate::server::middleware::Identity;

#[derive(Debug, Deserialize)]
pub struct ListLessonsQuery {
    /// Case-insensitive substring match on the title.
    pub title: Option<String>,
    pub featured: Option<bool>,
    pub sort: Option<LessonSort>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

fn parse_lesson_id(raw: &str) -> Result<LessonId, ApiError> {
    LessonId::parse(raw).map_err(|_| ApiError::validation("lesson id is not a valid id"))
}

pub async fn create_lesson(
    State(state): State<AppState>,
    Identity(actor_email): Identity,
    Json(input): Json<CreateLessonInput>,
) -> Result<(StatusCode, Json<LessonRecord>), ApiError> {
    let lesson = actions::create_lesson(&actor_email, input, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

pub async fn list_lessons(
    State(state): State<AppState>,
    Query(query): Query<ListLessonsQuery>,
) -> Result<Json<Page<LessonRecord>>, ApiError> {
    let filter = LessonFilter {
        title_contains: query.title,
        featured: query.featured,
        sort: query.sort.unwrap_or_default(),
    };
    let args = PageArgs {
        limit: query.limit,
        skip: query.skip,
    };
    let page = actions::list_lessons(filter, args, &state.deps).await?;
    Ok(Json(page))
}

pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LessonRecord>, ApiError> {
    let lesson = actions::get_lesson(parse_lesson_id(&id)?, &state.deps).await?;
    Ok(Json(lesson))
}

pub async fn by_author(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<LessonRecord>>, ApiError> {
    let lessons = actions::lessons_by_author(&email, &state.deps).await?;
    Ok(Json(lessons))
}

pub async fn delete_lesson(
    State(state): State<AppState>,
    Identity(actor_email): Identity,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    actions::delete_lesson(&actor_email, parse_lesson_id(&id)?, &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn react(
    State(state): State<AppState>,
    Identity(actor_email): Identity,
    Path(id): Path<String>,
    Json(reaction): Json<ReactionInput>,
) -> Result<Json<ReactionResponse>, ApiError> {
    let response =
        actions::react_to_lesson(&actor_email, parse_lesson_id(&id)?, reaction, &state.deps)
            .await?;
    Ok(Json(response))
}
