//! Postgres-backed store implementations.
//!
//! Thin adapters: all SQL lives on the model types; this module wires them
//! behind the `Base*Store` traits so actions stay storage-agnostic.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::entity_ids::{LessonId, UserId};
use crate::common::pagination::{Page, ValidatedPageArgs};
use crate::domains::lessons::discovery::TopContributor;
use crate::domains::lessons::engagement::{FavoriteOutcome, LikeOutcome, ModerationFlag};
use crate::domains::lessons::models::{Comment, LessonFilter, LessonRecord, NewLesson};
use crate::domains::reports::models::{NewReport, ReportCreateOutcome, ReportRecord};
use crate::domains::users::models::{NewUser, ProfileChanges, UserCreateOutcome, UserRecord};
use crate::kernel::traits::{BaseLessonStore, BaseReportStore, BaseUserStore};

/// Store handle with explicit lifecycle: constructed at startup from the
/// connection pool, dropped at shutdown.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BaseLessonStore for PgStore {
    async fn insert(&self, new: NewLesson) -> Result<LessonRecord> {
        LessonRecord::create(new, &self.pool).await
    }

    async fn find_by_id(&self, id: LessonId) -> Result<Option<LessonRecord>> {
        LessonRecord::find_by_id(id, &self.pool).await
    }

    async fn find_by_author(&self, author_email: &str) -> Result<Vec<LessonRecord>> {
        LessonRecord::find_by_author(author_email, &self.pool).await
    }

    async fn query_page(
        &self,
        filter: &LessonFilter,
        args: ValidatedPageArgs,
    ) -> Result<Page<LessonRecord>> {
        let (items, total) = LessonRecord::query_page(filter, args, &self.pool).await?;
        Ok(Page::new(items, total))
    }

    async fn delete(&self, id: LessonId) -> Result<bool> {
        LessonRecord::delete(id, &self.pool).await
    }

    async fn toggle_like(
        &self,
        id: LessonId,
        actor_email: &str,
    ) -> Result<Option<(LessonRecord, LikeOutcome)>> {
        let updated = LessonRecord::toggle_like(id, actor_email, &self.pool).await?;
        Ok(updated.map(|lesson| {
            let outcome = if lesson.liked_by.iter().any(|e| e == actor_email) {
                LikeOutcome::Liked
            } else {
                LikeOutcome::Unliked
            };
            (lesson, outcome)
        }))
    }

    async fn toggle_favorite(
        &self,
        id: LessonId,
        actor_email: &str,
    ) -> Result<Option<(LessonRecord, FavoriteOutcome)>> {
        let updated = LessonRecord::toggle_favorite(id, actor_email, &self.pool).await?;
        Ok(updated.map(|lesson| {
            let outcome = if lesson.favorited_by.0.iter().any(|e| e.email == actor_email) {
                FavoriteOutcome::NowSaved
            } else {
                FavoriteOutcome::NowUnsaved
            };
            (lesson, outcome)
        }))
    }

    async fn append_comment(
        &self,
        id: LessonId,
        comment: Comment,
    ) -> Result<Option<LessonRecord>> {
        LessonRecord::append_comment(id, &comment, &self.pool).await
    }

    async fn set_flag(&self, id: LessonId, flag: ModerationFlag) -> Result<Option<LessonRecord>> {
        LessonRecord::set_flag(id, flag, &self.pool).await
    }

    async fn related_by_tone(&self, id: LessonId, limit: i64) -> Result<Vec<LessonRecord>> {
        LessonRecord::related_by_tone(id, limit, &self.pool).await
    }

    async fn top_contributors(&self, window_days: i64, limit: i64) -> Result<Vec<TopContributor>> {
        TopContributor::query(window_days, limit, &self.pool).await
    }
}

#[async_trait]
impl BaseUserStore for PgStore {
    async fn create_if_absent(&self, new: NewUser) -> Result<UserCreateOutcome> {
        UserRecord::create_if_absent(new, &self.pool).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        UserRecord::find_by_email(email, &self.pool).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>> {
        UserRecord::find_by_id(id, &self.pool).await
    }

    async fn update_profile(
        &self,
        email: &str,
        changes: ProfileChanges,
    ) -> Result<Option<UserRecord>> {
        UserRecord::update_profile(email, changes, &self.pool).await
    }

    async fn delete_by_email(&self, email: &str) -> Result<bool> {
        UserRecord::delete_by_email(email, &self.pool).await
    }

    async fn grant_premium(&self, email: &str) -> Result<Option<UserRecord>> {
        UserRecord::grant_premium(email, &self.pool).await
    }
}

#[async_trait]
impl BaseReportStore for PgStore {
    async fn insert(&self, new: NewReport) -> Result<ReportCreateOutcome> {
        ReportRecord::create(new, &self.pool).await
    }

    async fn exists_for(&self, lesson_id: LessonId, reported_user_email: &str) -> Result<bool> {
        ReportRecord::exists_for(lesson_id, reported_user_email, &self.pool).await
    }

    async fn query_all(&self) -> Result<Vec<ReportRecord>> {
        ReportRecord::query_all(&self.pool).await
    }
}
