//! Server dependencies for actions (using traits for testability)
//!
//! Central dependency container handed to every action. All external
//! collaborators sit behind trait objects so tests can inject in-memory
//! doubles (see `test_dependencies`).

use std::sync::Arc;

use sqlx::PgPool;

use crate::kernel::pg_store::PgStore;
use crate::kernel::traits::{
    BaseCheckoutProvider, BaseLessonStore, BaseReportStore, BaseUserStore,
};

/// Server dependencies accessible to actions.
#[derive(Clone)]
pub struct ServerDeps {
    pub lessons: Arc<dyn BaseLessonStore>,
    pub users: Arc<dyn BaseUserStore>,
    pub reports: Arc<dyn BaseReportStore>,
    pub checkout: Arc<dyn BaseCheckoutProvider>,
    /// Price of the premium subscription, in cents.
    pub premium_price_cents: i64,
}

impl ServerDeps {
    pub fn new(
        lessons: Arc<dyn BaseLessonStore>,
        users: Arc<dyn BaseUserStore>,
        reports: Arc<dyn BaseReportStore>,
        checkout: Arc<dyn BaseCheckoutProvider>,
        premium_price_cents: i64,
    ) -> Self {
        Self {
            lessons,
            users,
            reports,
            checkout,
            premium_price_cents,
        }
    }

    /// Production wiring: every store backed by the same Postgres pool.
    pub fn postgres(
        pool: PgPool,
        checkout: Arc<dyn BaseCheckoutProvider>,
        premium_price_cents: i64,
    ) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            lessons: store.clone(),
            users: store.clone(),
            reports: store,
            checkout,
            premium_price_cents,
        }
    }
}
