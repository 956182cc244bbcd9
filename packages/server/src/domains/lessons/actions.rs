//! Lesson actions - entry-point functions for lesson CRUD, reactions,
//! and discovery queries.

use serde::{Deserialize, Serialize};

use crate::common::auth::Capability;
use crate::common::entity_ids::LessonId;
use crate::common::errors::ApiError;
use crate::common::pagination::{Page, PageArgs};
use crate::domains::lessons::discovery::{
    TopContributor, DEFAULT_DISCOVERY_LIMIT, DEFAULT_WINDOW_DAYS,
};
use crate::domains::lessons::engagement::{self, ModerationFlag};
use crate::domains::lessons::models::{LessonFilter, LessonRecord, NewLesson};
use crate::domains::users::actions::{require_email, resolve_actor};
use crate::kernel::ServerDeps;

pub const ACCESS_PUBLIC: &str = "public";
pub const ACCESS_PREMIUM: &str = "premium";

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLessonInput {
    pub title: String,
    pub body: String,
    pub emotional_tone: String,
    pub access_level: Option<String>,
}

/// A reaction against a lesson, dispatched by kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReactionInput {
    Like,
    Favorite,
    Comment {
        text: String,
        photo_url: Option<String>,
    },
    Reviewed,
    Featured {
        value: bool,
    },
    Reported,
}

/// Result of a reaction: the resulting status label plus the lesson as
/// persisted after the delta was applied.
#[derive(Debug, Clone, Serialize)]
pub struct ReactionResponse {
    pub status: String,
    pub lesson: LessonRecord,
}

fn require_present(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

/// Create a lesson authored by the actor. Premium-gated access levels
/// require a premium account.
pub async fn create_lesson(
    actor_email: &str,
    input: CreateLessonInput,
    deps: &ServerDeps,
) -> Result<LessonRecord, ApiError> {
    require_email(actor_email, "actor email")?;
    require_present(&input.title, "title")?;
    require_present(&input.body, "body")?;
    require_present(&input.emotional_tone, "emotional tone")?;

    let access_level = input
        .access_level
        .unwrap_or_else(|| ACCESS_PUBLIC.to_string());
    if access_level == ACCESS_PREMIUM {
        let actor = resolve_actor(actor_email, deps).await?;
        actor.can(Capability::Premium).check()?;
    }

    let lesson = deps
        .lessons
        .insert(NewLesson {
            author_email: actor_email.to_string(),
            title: input.title,
            body: input.body,
            emotional_tone: input.emotional_tone,
            access_level,
        })
        .await?;
    Ok(lesson)
}

pub async fn get_lesson(id: LessonId, deps: &ServerDeps) -> Result<LessonRecord, ApiError> {
    deps.lessons
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("lesson"))
}

pub async fn list_lessons(
    filter: LessonFilter,
    args: PageArgs,
    deps: &ServerDeps,
) -> Result<Page<LessonRecord>, ApiError> {
    let page = deps.lessons.query_page(&filter, args.validate()).await?;
    Ok(page)
}

pub async fn lessons_by_author(
    author_email: &str,
    deps: &ServerDeps,
) -> Result<Vec<LessonRecord>, ApiError> {
    require_email(author_email, "author email")?;
    let lessons = deps.lessons.find_by_author(author_email).await?;
    Ok(lessons)
}

/// Delete a lesson (owner or admin). Removal is immediate; there is no
/// soft-delete.
pub async fn delete_lesson(
    actor_email: &str,
    id: LessonId,
    deps: &ServerDeps,
) -> Result<(), ApiError> {
    let lesson = get_lesson(id, deps).await?;
    let actor = resolve_actor(actor_email, deps).await?;
    actor
        .can(Capability::owner(&lesson.author_email))
        .check()?;

    if deps.lessons.delete(id).await? {
        Ok(())
    } else {
        Err(ApiError::not_found("lesson"))
    }
}

/// Apply a reaction to a lesson.
///
/// Like and favorite toggle the actor's membership; comments append;
/// moderation flags set. Review/feature flags are admin capabilities.
pub async fn react_to_lesson(
    actor_email: &str,
    id: LessonId,
    reaction: ReactionInput,
    deps: &ServerDeps,
) -> Result<ReactionResponse, ApiError> {
    require_email(actor_email, "actor email")?;

    match reaction {
        ReactionInput::Like => {
            let (lesson, outcome) = deps
                .lessons
                .toggle_like(id, actor_email)
                .await?
                .ok_or_else(|| ApiError::not_found("lesson"))?;
            Ok(ReactionResponse {
                status: outcome.as_status().to_string(),
                lesson,
            })
        }
        ReactionInput::Favorite => {
            let (lesson, outcome) = deps
                .lessons
                .toggle_favorite(id, actor_email)
                .await?
                .ok_or_else(|| ApiError::not_found("lesson"))?;
            Ok(ReactionResponse {
                status: outcome.as_status().to_string(),
                lesson,
            })
        }
        ReactionInput::Comment { text, photo_url } => {
            require_present(&text, "comment text")?;
            let comment = engagement::new_comment(actor_email, &text, photo_url);
            let lesson = deps
                .lessons
                .append_comment(id, comment)
                .await?
                .ok_or_else(|| ApiError::not_found("lesson"))?;
            Ok(ReactionResponse {
                status: "comment-added".to_string(),
                lesson,
            })
        }
        ReactionInput::Reviewed => {
            set_moderation_flag(actor_email, id, ModerationFlag::Reviewed, true, deps).await
        }
        ReactionInput::Featured { value } => {
            set_moderation_flag(actor_email, id, ModerationFlag::Featured(value), true, deps).await
        }
        ReactionInput::Reported => {
            set_moderation_flag(actor_email, id, ModerationFlag::Reported, false, deps).await
        }
    }
}

async fn set_moderation_flag(
    actor_email: &str,
    id: LessonId,
    flag: ModerationFlag,
    admin_only: bool,
    deps: &ServerDeps,
) -> Result<ReactionResponse, ApiError> {
    if admin_only {
        let actor = resolve_actor(actor_email, deps).await?;
        actor.can(Capability::Admin).check()?;
    }
    let lesson = deps
        .lessons
        .set_flag(id, flag)
        .await?
        .ok_or_else(|| ApiError::not_found("lesson"))?;
    Ok(ReactionResponse {
        status: "flag-set".to_string(),
        lesson,
    })
}

/// Top contributors over a trailing window (defaults: 7 days, 6 rows).
pub async fn top_contributors(
    window_days: Option<i64>,
    limit: Option<i64>,
    deps: &ServerDeps,
) -> Result<Vec<TopContributor>, ApiError> {
    let window_days = window_days.unwrap_or(DEFAULT_WINDOW_DAYS).max(1);
    let limit = limit.unwrap_or(DEFAULT_DISCOVERY_LIMIT).clamp(1, 50);
    let contributors = deps.lessons.top_contributors(window_days, limit).await?;
    Ok(contributors)
}

/// Lessons sharing the source's emotional tone, newest first, excluding
/// the source itself.
pub async fn related_lessons(
    id: LessonId,
    limit: Option<i64>,
    deps: &ServerDeps,
) -> Result<Vec<LessonRecord>, ApiError> {
    // NotFound must win over an empty result set.
    get_lesson(id, deps).await?;
    let limit = limit.unwrap_or(DEFAULT_DISCOVERY_LIMIT).clamp(1, 50);
    let lessons = deps.lessons.related_by_tone(id, limit).await?;
    Ok(lessons)
}
