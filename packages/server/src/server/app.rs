//! Application state and router assembly.

use std::sync::Arc;

use axum::middleware;
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::{BaseIdentityVerifier, ServerDeps};
use crate::server::middleware::identity_middleware;
use crate::server::routes;

#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
    pub db_pool: PgPool,
    pub identity: Arc<dyn BaseIdentityVerifier>,
}

/// Build the axum application with tracing, CORS, and identity layers.
pub fn build_app(state: AppState) -> Router {
    routes::router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
