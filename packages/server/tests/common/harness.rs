//! Test harnesses.
//!
//! `TestHarness` wires actions to in-memory doubles and runs without any
//! external service. `PgHarness` backs the stores with a real Postgres
//! started through testcontainers; the container and migrations are shared
//! across the whole test run.

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::kernel::test_dependencies::{MemoryStore, MockCheckoutProvider};
use server_core::kernel::{ServerDeps, TestDependencies};
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// In-memory harness: every collaborator is a double.
pub struct TestHarness {
    pub deps: ServerDeps,
    pub store: Arc<MemoryStore>,
    pub checkout: Arc<MockCheckoutProvider>,
}

impl TestHarness {
    pub fn new() -> Self {
        let TestDependencies {
            deps,
            store,
            checkout,
        } = TestDependencies::new();
        Self {
            deps,
            store,
            checkout,
        }
    }
}

/// Shared Postgres infrastructure, started once and reused by every test.
struct SharedPgInfra {
    db_url: String,
    // Keeps the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_PG: OnceCell<SharedPgInfra> = OnceCell::const_new();

impl SharedPgInfra {
    async fn init() -> Result<Self> {
        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let host = postgres.get_host().await?;
        let port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_PG
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared Postgres infrastructure")
            })
            .await
    }
}

/// Postgres-backed harness for exercising the SQL paths.
///
/// Tests share one database, so fixtures must use distinct emails and ids.
pub struct PgHarness {
    pub db_pool: PgPool,
}

impl PgHarness {
    pub async fn new() -> Self {
        let infra = SharedPgInfra::get().await;
        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .expect("Failed to connect to shared test database");
        Self { db_pool }
    }
}
