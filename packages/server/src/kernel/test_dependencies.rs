// TestDependencies - in-memory implementations for testing
//
// Provides store and collaborator doubles that can be injected into
// ServerDeps for tests. The store serializes every operation behind one
// async mutex and applies the same pure transition functions the Postgres
// store expresses in SQL, so engine invariants hold identically.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::types::Json;
use tokio::sync::Mutex;

use crate::common::auth::AuthError;
use crate::common::entity_ids::{LessonId, ReportId, UserId};
use crate::common::pagination::{Page, ValidatedPageArgs};
use crate::domains::lessons::discovery::TopContributor;
use crate::domains::lessons::engagement::{
    self, FavoriteOutcome, LikeOutcome, ModerationFlag,
};
use crate::domains::lessons::models::{
    Comment, LessonFilter, LessonRecord, LessonSort, NewLesson,
};
use crate::domains::reports::models::{
    NewReport, ReportCreateOutcome, ReportRecord, STATUS_PENDING,
};
use crate::domains::users::models::{
    NewUser, ProfileChanges, UserCreateOutcome, UserRecord, ROLE_USER,
};
use crate::kernel::deps::ServerDeps;
use crate::kernel::traits::{
    BaseCheckoutProvider, BaseIdentityVerifier, BaseLessonStore, BaseReportStore, BaseUserStore,
    CheckoutSession,
};

// =============================================================================
// In-memory store
// =============================================================================

#[derive(Default)]
struct MemoryInner {
    users: Vec<UserRecord>,
    lessons: Vec<LessonRecord>,
    reports: Vec<ReportRecord>,
}

/// In-memory store double for all three collections.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backdate a lesson's creation time, for window-based ranking tests.
    pub async fn age_lesson(&self, id: LessonId, days: i64) {
        let mut inner = self.inner.lock().await;
        if let Some(lesson) = inner.lessons.iter_mut().find(|l| l.id == id) {
            lesson.created_at = Utc::now() - Duration::days(days);
        }
    }
}

#[async_trait]
impl BaseLessonStore for MemoryStore {
    async fn insert(&self, new: NewLesson) -> Result<LessonRecord> {
        let lesson = LessonRecord {
            id: LessonId::new(),
            author_email: new.author_email,
            title: new.title,
            body: new.body,
            emotional_tone: new.emotional_tone,
            access_level: new.access_level,
            featured: false,
            reviewed: false,
            reported: false,
            like_count: 0,
            liked_by: vec![],
            total_favorites: 0,
            favorited_by: Json(vec![]),
            comments: None,
            created_at: Utc::now(),
        };
        self.inner.lock().await.lessons.push(lesson.clone());
        Ok(lesson)
    }

    async fn find_by_id(&self, id: LessonId) -> Result<Option<LessonRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner.lessons.iter().find(|l| l.id == id).cloned())
    }

    async fn find_by_author(&self, author_email: &str) -> Result<Vec<LessonRecord>> {
        let inner = self.inner.lock().await;
        let mut matches: Vec<_> = inner
            .lessons
            .iter()
            .filter(|l| l.author_email == author_email)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn query_page(
        &self,
        filter: &LessonFilter,
        args: ValidatedPageArgs,
    ) -> Result<Page<LessonRecord>> {
        let inner = self.inner.lock().await;
        let total = inner.lessons.len() as i64;

        let needle = filter.title_contains.as_ref().map(|t| t.to_lowercase());
        let mut matches: Vec<_> = inner
            .lessons
            .iter()
            .filter(|l| {
                needle
                    .as_ref()
                    .map(|n| l.title.to_lowercase().contains(n))
                    .unwrap_or(true)
            })
            .filter(|l| filter.featured.map(|f| l.featured == f).unwrap_or(true))
            .cloned()
            .collect();

        match filter.sort {
            LessonSort::Newest => matches.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            LessonSort::MostFavorited => matches.sort_by(|a, b| {
                b.total_favorites
                    .cmp(&a.total_favorites)
                    .then(b.created_at.cmp(&a.created_at))
            }),
        }

        let items = matches
            .into_iter()
            .skip(args.skip as usize)
            .take(args.limit as usize)
            .collect();
        Ok(Page::new(items, total))
    }

    async fn delete(&self, id: LessonId) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        let before = inner.lessons.len();
        inner.lessons.retain(|l| l.id != id);
        Ok(inner.lessons.len() < before)
    }

    async fn toggle_like(
        &self,
        id: LessonId,
        actor_email: &str,
    ) -> Result<Option<(LessonRecord, LikeOutcome)>> {
        let mut inner = self.inner.lock().await;
        Ok(inner.lessons.iter_mut().find(|l| l.id == id).map(|lesson| {
            let outcome = engagement::apply_like(lesson, actor_email);
            (lesson.clone(), outcome)
        }))
    }

    async fn toggle_favorite(
        &self,
        id: LessonId,
        actor_email: &str,
    ) -> Result<Option<(LessonRecord, FavoriteOutcome)>> {
        let mut inner = self.inner.lock().await;
        Ok(inner.lessons.iter_mut().find(|l| l.id == id).map(|lesson| {
            let outcome = engagement::apply_favorite(lesson, actor_email);
            (lesson.clone(), outcome)
        }))
    }

    async fn append_comment(
        &self,
        id: LessonId,
        comment: Comment,
    ) -> Result<Option<LessonRecord>> {
        let mut inner = self.inner.lock().await;
        Ok(inner.lessons.iter_mut().find(|l| l.id == id).map(|lesson| {
            engagement::apply_comment(lesson, comment);
            lesson.clone()
        }))
    }

    async fn set_flag(&self, id: LessonId, flag: ModerationFlag) -> Result<Option<LessonRecord>> {
        let mut inner = self.inner.lock().await;
        Ok(inner.lessons.iter_mut().find(|l| l.id == id).map(|lesson| {
            engagement::apply_flag(lesson, flag);
            lesson.clone()
        }))
    }

    async fn related_by_tone(&self, id: LessonId, limit: i64) -> Result<Vec<LessonRecord>> {
        let inner = self.inner.lock().await;
        let Some(source) = inner.lessons.iter().find(|l| l.id == id) else {
            return Ok(vec![]);
        };
        let tone = source.emotional_tone.clone();
        let mut matches: Vec<_> = inner
            .lessons
            .iter()
            .filter(|l| l.id != id && l.emotional_tone == tone)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matches.truncate(limit as usize);
        Ok(matches)
    }

    async fn top_contributors(&self, window_days: i64, limit: i64) -> Result<Vec<TopContributor>> {
        let inner = self.inner.lock().await;
        let cutoff = Utc::now() - Duration::days(window_days);

        let mut counts: Vec<(String, i64)> = Vec::new();
        for lesson in inner.lessons.iter().filter(|l| l.created_at >= cutoff) {
            match counts.iter_mut().find(|(email, _)| *email == lesson.author_email) {
                Some((_, n)) => *n += 1,
                None => counts.push((lesson.author_email.clone(), 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts.truncate(limit as usize);

        Ok(counts
            .into_iter()
            .map(|(email, n)| {
                let profile = inner.users.iter().find(|u| u.email == email);
                TopContributor {
                    author_email: email,
                    lesson_count: n,
                    display_name: profile.and_then(|u| u.display_name.clone()),
                    photo_url: profile.and_then(|u| u.photo_url.clone()),
                }
            })
            .collect())
    }
}

#[async_trait]
impl BaseUserStore for MemoryStore {
    async fn create_if_absent(&self, new: NewUser) -> Result<UserCreateOutcome> {
        let mut inner = self.inner.lock().await;
        if inner.users.iter().any(|u| u.email == new.email) {
            return Ok(UserCreateOutcome::AlreadyExists);
        }
        let user = UserRecord {
            id: UserId::new(),
            email: new.email,
            display_name: new.display_name,
            photo_url: new.photo_url,
            role: ROLE_USER.to_string(),
            is_premium: false,
            created_at: Utc::now(),
            premium_at: None,
        };
        inner.users.push(user.clone());
        Ok(UserCreateOutcome::Created(user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_profile(
        &self,
        email: &str,
        changes: ProfileChanges,
    ) -> Result<Option<UserRecord>> {
        let mut inner = self.inner.lock().await;
        Ok(inner.users.iter_mut().find(|u| u.email == email).map(|user| {
            if let Some(display_name) = changes.display_name {
                user.display_name = Some(display_name);
            }
            if let Some(photo_url) = changes.photo_url {
                user.photo_url = Some(photo_url);
            }
            if let Some(role) = changes.role {
                user.role = role;
            }
            user.clone()
        }))
    }

    async fn delete_by_email(&self, email: &str) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        let before = inner.users.len();
        inner.users.retain(|u| u.email != email);
        Ok(inner.users.len() < before)
    }

    async fn grant_premium(&self, email: &str) -> Result<Option<UserRecord>> {
        let mut inner = self.inner.lock().await;
        Ok(inner.users.iter_mut().find(|u| u.email == email).map(|user| {
            user.is_premium = true;
            user.premium_at.get_or_insert_with(Utc::now);
            user.clone()
        }))
    }
}

#[async_trait]
impl BaseReportStore for MemoryStore {
    async fn insert(&self, new: NewReport) -> Result<ReportCreateOutcome> {
        let mut inner = self.inner.lock().await;
        let duplicate = inner.reports.iter().any(|r| {
            r.lesson_id == new.lesson_id && r.reported_user_email == new.reported_user_email
        });
        if duplicate {
            return Ok(ReportCreateOutcome::Duplicate);
        }
        let report = ReportRecord {
            id: ReportId::new(),
            lesson_id: new.lesson_id,
            reporter_user_id: new.reporter_user_id,
            reported_user_email: new.reported_user_email,
            reason: new.reason,
            status: STATUS_PENDING.to_string(),
            created_at: Utc::now(),
        };
        inner.reports.push(report.clone());
        Ok(ReportCreateOutcome::Created(report))
    }

    async fn exists_for(&self, lesson_id: LessonId, reported_user_email: &str) -> Result<bool> {
        let inner = self.inner.lock().await;
        Ok(inner
            .reports
            .iter()
            .any(|r| r.lesson_id == lesson_id && r.reported_user_email == reported_user_email))
    }

    async fn query_all(&self) -> Result<Vec<ReportRecord>> {
        let inner = self.inner.lock().await;
        let mut reports = inner.reports.clone();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }
}

// =============================================================================
// Collaborator doubles
// =============================================================================

/// Checkout double that records every session request.
#[derive(Default)]
pub struct MockCheckoutProvider {
    pub calls: Mutex<Vec<(String, i64)>>,
}

#[async_trait]
impl BaseCheckoutProvider for MockCheckoutProvider {
    async fn create_checkout(
        &self,
        customer_email: &str,
        amount_cents: i64,
    ) -> Result<CheckoutSession> {
        self.calls
            .lock()
            .await
            .push((customer_email.to_string(), amount_cents));
        Ok(CheckoutSession {
            url: format!("https://checkout.test/session/{customer_email}"),
        })
    }
}

/// Identity double: treats the credential itself as the verified email.
pub struct StaticIdentityVerifier;

#[async_trait]
impl BaseIdentityVerifier for StaticIdentityVerifier {
    async fn verify_email(&self, credential: &str) -> Result<String, AuthError> {
        if credential.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        Ok(credential.to_string())
    }
}

/// ServerDeps wired entirely to in-memory doubles, plus handles to them.
pub struct TestDependencies {
    pub deps: ServerDeps,
    pub store: Arc<MemoryStore>,
    pub checkout: Arc<MockCheckoutProvider>,
}

impl TestDependencies {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let checkout = Arc::new(MockCheckoutProvider::default());
        let deps = ServerDeps::new(
            store.clone(),
            store.clone(),
            store.clone(),
            checkout.clone(),
            999,
        );
        Self {
            deps,
            store,
            checkout,
        }
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
