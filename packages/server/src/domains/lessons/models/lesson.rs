use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, QueryBuilder};

use crate::common::entity_ids::LessonId;
use crate::common::pagination::ValidatedPageArgs;
use crate::domains::lessons::engagement::ModerationFlag;

/// One favorite mark on a lesson.
///
/// Stored as an ordered jsonb sequence, not a set: uniqueness by email is
/// an engine invariant, enforced by the conditional toggle statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub email: String,
    pub marker: String,
}

/// One comment on a lesson. Comments are an append-only log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub author_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

/// Lesson model - SQL persistence layer.
///
/// Engagement sub-state lives on the row itself (`liked_by` as a text
/// array, `favorited_by`/`comments` as jsonb) so every reaction is a
/// single-statement conditional update.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonRecord {
    pub id: LessonId,
    pub author_email: String,
    pub title: String,
    pub body: String,
    pub emotional_tone: String,
    pub access_level: String,
    pub featured: bool,
    pub reviewed: bool,
    pub reported: bool,
    pub like_count: i64,
    pub liked_by: Vec<String>,
    pub total_favorites: i64,
    pub favorited_by: Json<Vec<FavoriteEntry>>,
    pub comments: Option<Json<Vec<Comment>>>,
    pub created_at: DateTime<Utc>,
}

impl LessonRecord {
    /// Comments as a slice, treating an uninitialized log as empty.
    pub fn comment_log(&self) -> &[Comment] {
        self.comments.as_ref().map(|c| c.0.as_slice()).unwrap_or(&[])
    }
}

/// Fields for creating a lesson. `created_at` is server-assigned.
#[derive(Debug, Clone)]
pub struct NewLesson {
    pub author_email: String,
    pub title: String,
    pub body: String,
    pub emotional_tone: String,
    pub access_level: String,
}

/// Filters for the lesson listing.
#[derive(Debug, Clone, Default)]
pub struct LessonFilter {
    /// Case-insensitive substring match on the title.
    pub title_contains: Option<String>,
    pub featured: Option<bool>,
    pub sort: LessonSort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonSort {
    /// Creation time descending.
    #[default]
    Newest,
    /// Total favorites descending.
    MostFavorited,
}

impl LessonRecord {
    pub async fn create(new: NewLesson, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO life_lessons (id, author_email, title, body, emotional_tone, access_level)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(LessonId::new())
        .bind(new.author_email)
        .bind(new.title)
        .bind(new.body)
        .bind(new.emotional_tone)
        .bind(new.access_level)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: LessonId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM life_lessons WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_author(author_email: &str, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM life_lessons WHERE author_email = $1 ORDER BY created_at DESC",
        )
        .bind(author_email)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Filtered, sorted, paginated listing.
    ///
    /// Returns the page plus the total unfiltered document count, which the
    /// listing endpoint reports alongside the page.
    pub async fn query_page(
        filter: &LessonFilter,
        args: ValidatedPageArgs,
        pool: &PgPool,
    ) -> Result<(Vec<Self>, i64)> {
        let mut builder = QueryBuilder::new("SELECT * FROM life_lessons WHERE TRUE");

        if let Some(ref title) = filter.title_contains {
            builder.push(" AND title ILIKE ");
            builder.push_bind(format!("%{}%", escape_like(title)));
        }
        if let Some(featured) = filter.featured {
            builder.push(" AND featured = ");
            builder.push_bind(featured);
        }

        match filter.sort {
            LessonSort::Newest => builder.push(" ORDER BY created_at DESC"),
            LessonSort::MostFavorited => {
                builder.push(" ORDER BY total_favorites DESC, created_at DESC")
            }
        };

        builder.push(" LIMIT ");
        builder.push_bind(args.limit);
        builder.push(" OFFSET ");
        builder.push_bind(args.skip);

        let items = builder.build_query_as::<Self>().fetch_all(pool).await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM life_lessons")
            .fetch_one(pool)
            .await?;

        Ok((items, total))
    }

    pub async fn delete(id: LessonId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM life_lessons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Toggle the actor's like in a single conditional statement.
    ///
    /// Both CASE branches evaluate against the pre-update row, so a pair of
    /// racing toggles cannot produce duplicate `liked_by` entries or drift
    /// `like_count` away from the set size.
    pub async fn toggle_like(id: LessonId, actor_email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE life_lessons SET
                 like_count = CASE
                     WHEN $2 = ANY(liked_by) THEN GREATEST(like_count - 1, 0)
                     ELSE like_count + 1
                 END,
                 liked_by = CASE
                     WHEN $2 = ANY(liked_by) THEN array_remove(liked_by, $2)
                     ELSE array_append(liked_by, $2)
                 END
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(actor_email)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Toggle the actor's favorite in a single conditional statement.
    ///
    /// Membership is checked by email against the jsonb sequence in the
    /// same statement that mutates it. `total_favorites` is floored at zero.
    pub async fn toggle_favorite(
        id: LessonId,
        actor_email: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE life_lessons SET
                 total_favorites = CASE
                     WHEN favorited_by @> jsonb_build_array(jsonb_build_object('email', $2::text))
                     THEN GREATEST(total_favorites - 1, 0)
                     ELSE total_favorites + 1
                 END,
                 favorited_by = CASE
                     WHEN favorited_by @> jsonb_build_array(jsonb_build_object('email', $2::text))
                     THEN (SELECT COALESCE(jsonb_agg(entry), '[]'::jsonb)
                           FROM jsonb_array_elements(favorited_by) AS entry
                           WHERE entry->>'email' <> $2::text)
                     ELSE favorited_by
                         || jsonb_build_array(jsonb_build_object('email', $2::text, 'marker', 'save'))
                 END
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(actor_email)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Append a comment, initializing the log atomically if absent.
    pub async fn append_comment(
        id: LessonId,
        comment: &Comment,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE life_lessons
             SET comments = COALESCE(comments, '[]'::jsonb) || $2
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(Json(vec![comment.clone()]))
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Set a moderation flag unconditionally.
    pub async fn set_flag(id: LessonId, flag: ModerationFlag, pool: &PgPool) -> Result<Option<Self>> {
        let query = match flag {
            ModerationFlag::Reviewed => {
                sqlx::query_as::<_, Self>(
                    "UPDATE life_lessons SET reviewed = TRUE WHERE id = $1 RETURNING *",
                )
                .bind(id)
            }
            ModerationFlag::Featured(value) => {
                sqlx::query_as::<_, Self>(
                    "UPDATE life_lessons SET featured = $2 WHERE id = $1 RETURNING *",
                )
                .bind(id)
                .bind(value)
            }
            ModerationFlag::Reported => {
                sqlx::query_as::<_, Self>(
                    "UPDATE life_lessons SET reported = TRUE WHERE id = $1 RETURNING *",
                )
                .bind(id)
            }
        };
        query.fetch_optional(pool).await.map_err(Into::into)
    }

    /// Up to `limit` other lessons sharing the source lesson's emotional
    /// tone, newest first. The source itself is excluded.
    pub async fn related_by_tone(id: LessonId, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT other.*
             FROM life_lessons other
             JOIN life_lessons src ON src.id = $1
             WHERE other.emotional_tone = src.emotional_tone
               AND other.id <> src.id
             ORDER BY other.created_at DESC
             LIMIT $2",
        )
        .bind(id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

/// Escape LIKE metacharacters so a title filter matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
