//! HTTP route handlers. Handlers stay thin: extract, delegate to the
//! domain action, serialize.

pub mod billing;
pub mod discovery;
pub mod health;
pub mod lessons;
pub mod reports;
pub mod users;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::server::app::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health::health_handler))
        .route("/users", post(users::create_user))
        .route(
            "/users/:email",
            patch(users::update_user).delete(users::delete_user),
        )
        .route(
            "/life_lessons",
            post(lessons::create_lesson).get(lessons::list_lessons),
        )
        .route(
            "/life_lessons/:id",
            get(lessons::get_lesson).delete(lessons::delete_lesson),
        )
        .route("/life_lessons/:id/reactions", post(lessons::react))
        .route("/life_lessons/:id/related", get(discovery::related_lessons))
        .route("/life_lessons/author/:email", get(lessons::by_author))
        .route(
            "/reports",
            post(reports::create_report).get(reports::list_reports),
        )
        .route("/top-contributors", get(discovery::top_contributors))
        .route("/premium/checkout", post(billing::begin_checkout))
        .route("/premium/confirm", post(billing::confirm_premium))
}

async fn root() -> &'static str {
    "Digital Life Lessons running...!"
}
