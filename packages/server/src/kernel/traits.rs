// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. Business rules
// (toggle semantics, report dedup steps) live in domain code that uses
// these traits.
//
// Naming convention: Base* for trait names (e.g., BaseLessonStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::auth::AuthError;
use crate::common::entity_ids::{LessonId, UserId};
use crate::common::pagination::{Page, ValidatedPageArgs};
use crate::domains::lessons::discovery::TopContributor;
use crate::domains::lessons::engagement::{FavoriteOutcome, LikeOutcome, ModerationFlag};
use crate::domains::lessons::models::{Comment, LessonFilter, LessonRecord, NewLesson};
use crate::domains::reports::models::{NewReport, ReportCreateOutcome, ReportRecord};
use crate::domains::users::models::{NewUser, ProfileChanges, UserCreateOutcome, UserRecord};

// =============================================================================
// Lesson Store Trait (Infrastructure)
// =============================================================================

/// Storage adapter for lessons and their engagement sub-state.
///
/// The toggle methods MUST be atomic per call: implementations either issue
/// a single conditional update or serialize applications, so two racing
/// toggles from the same actor cannot duplicate membership or drift counts.
/// `None` means the lesson does not exist.
#[async_trait]
pub trait BaseLessonStore: Send + Sync {
    async fn insert(&self, new: NewLesson) -> Result<LessonRecord>;

    async fn find_by_id(&self, id: LessonId) -> Result<Option<LessonRecord>>;

    async fn find_by_author(&self, author_email: &str) -> Result<Vec<LessonRecord>>;

    /// Filtered page plus the total unfiltered document count.
    async fn query_page(
        &self,
        filter: &LessonFilter,
        args: ValidatedPageArgs,
    ) -> Result<Page<LessonRecord>>;

    /// Immediate removal; returns false if the lesson was already gone.
    async fn delete(&self, id: LessonId) -> Result<bool>;

    async fn toggle_like(
        &self,
        id: LessonId,
        actor_email: &str,
    ) -> Result<Option<(LessonRecord, LikeOutcome)>>;

    async fn toggle_favorite(
        &self,
        id: LessonId,
        actor_email: &str,
    ) -> Result<Option<(LessonRecord, FavoriteOutcome)>>;

    async fn append_comment(&self, id: LessonId, comment: Comment)
        -> Result<Option<LessonRecord>>;

    async fn set_flag(&self, id: LessonId, flag: ModerationFlag) -> Result<Option<LessonRecord>>;

    /// Other lessons sharing the source's emotional tone, newest first.
    /// Empty when the source lesson is absent; callers wanting a not-found
    /// distinction check existence first.
    async fn related_by_tone(&self, id: LessonId, limit: i64) -> Result<Vec<LessonRecord>>;

    async fn top_contributors(&self, window_days: i64, limit: i64) -> Result<Vec<TopContributor>>;
}

// =============================================================================
// User Store Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseUserStore: Send + Sync {
    /// Insert-if-absent by unique email.
    async fn create_if_absent(&self, new: NewUser) -> Result<UserCreateOutcome>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>>;

    async fn update_profile(
        &self,
        email: &str,
        changes: ProfileChanges,
    ) -> Result<Option<UserRecord>>;

    async fn delete_by_email(&self, email: &str) -> Result<bool>;

    /// Set is_premium; premium_at is set once, on first upgrade.
    async fn grant_premium(&self, email: &str) -> Result<Option<UserRecord>>;
}

// =============================================================================
// Report Store Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseReportStore: Send + Sync {
    /// Insert guarded by the (lesson, reported user) dedup constraint.
    async fn insert(&self, new: NewReport) -> Result<ReportCreateOutcome>;

    async fn exists_for(&self, lesson_id: LessonId, reported_user_email: &str) -> Result<bool>;

    async fn query_all(&self) -> Result<Vec<ReportRecord>>;
}

// =============================================================================
// Identity Verification Trait (Infrastructure)
// =============================================================================

/// External identity provider contract: a bearer credential resolves to a
/// verified email, which the core trusts as the actor identity.
#[async_trait]
pub trait BaseIdentityVerifier: Send + Sync {
    async fn verify_email(&self, credential: &str) -> Result<String, AuthError>;
}

// =============================================================================
// Checkout Provider Trait (Infrastructure)
// =============================================================================

/// A hosted checkout session created by the external payment processor.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// Redirect URL for the hosted payment page.
    pub url: String,
}

/// External payment processor contract. The core never tracks session
/// completion; premium confirmation arrives through a separate call.
#[async_trait]
pub trait BaseCheckoutProvider: Send + Sync {
    async fn create_checkout(
        &self,
        customer_email: &str,
        amount_cents: i64,
    ) -> Result<CheckoutSession>;
}
