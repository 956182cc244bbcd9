use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::common::errors::ApiError;
use crate::domains::users::actions;
use crate::domains::users::models::{ProfileChanges, UserCreateOutcome};
use crate::server::app::AppState;
use crate::server::middleware::Identity;

pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<actions::RegisterUserInput>,
) -> Result<Response, ApiError> {
    let outcome = actions::register_user(input, &state.deps).await?;
    Ok(match outcome {
        UserCreateOutcome::Created(user) => (StatusCode::CREATED, Json(user)).into_response(),
        UserCreateOutcome::AlreadyExists => {
            Json(json!({ "message": "user exists" })).into_response()
        }
    })
}

pub async fn update_user(
    State(state): State<AppState>,
    Identity(actor_email): Identity,
    Path(email): Path<String>,
    Json(changes): Json<ProfileChanges>,
) -> Result<Response, ApiError> {
    let user = actions::update_user_profile(&actor_email, &email, changes, &state.deps).await?;
    Ok(Json(user).into_response())
}

pub async fn delete_user(
    State(state): State<AppState>,
    Identity(actor_email): Identity,
    Path(email): Path<String>,
) -> Result<StatusCode, ApiError> {
    actions::remove_user(&actor_email, &email, &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}
