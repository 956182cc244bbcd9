use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::common::errors::ApiError;
use crate::domains::billing::actions;
use crate::domains::users::models::UserRecord;
use crate::server::app::AppState;
use crate::server::middleware::Identity;

#[derive(Debug, Deserialize)]
pub struct ConfirmPremiumInput {
    pub email: String,
}

/// Begin a hosted checkout session for the authenticated actor.
pub async fn begin_checkout(
    State(state): State<AppState>,
    Identity(actor_email): Identity,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = actions::begin_premium_checkout(&actor_email, &state.deps).await?;
    Ok(Json(json!({ "url": session.url })))
}

/// Confirm premium for an email. Driven by the payment processor's
/// webhook or the client after checkout; no verification happens here.
pub async fn confirm_premium(
    State(state): State<AppState>,
    Json(input): Json<ConfirmPremiumInput>,
) -> Result<Json<UserRecord>, ApiError> {
    let user = actions::confirm_premium(&input.email, &state.deps).await?;
    Ok(Json(user))
}
