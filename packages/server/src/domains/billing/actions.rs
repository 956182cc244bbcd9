//! Billing actions - premium checkout delegation and confirmation.

use crate::common::errors::ApiError;
use crate::domains::users::actions::require_email;
use crate::domains::users::models::UserRecord;
use crate::kernel::{CheckoutSession, ServerDeps};

/// Begin a premium checkout: delegate to the payment processor and hand
/// back the hosted session's redirect URL. No session state is kept here.
pub async fn begin_premium_checkout(
    actor_email: &str,
    deps: &ServerDeps,
) -> Result<CheckoutSession, ApiError> {
    require_email(actor_email, "actor email")?;
    let session = deps
        .checkout
        .create_checkout(actor_email, deps.premium_price_cents)
        .await?;
    Ok(session)
}

/// Confirm premium for an email: sets the flag unconditionally, with the
/// upgrade timestamp recorded once. Payment verification happened outside.
pub async fn confirm_premium(email: &str, deps: &ServerDeps) -> Result<UserRecord, ApiError> {
    require_email(email, "email")?;
    deps.users
        .grant_premium(email)
        .await?
        .ok_or_else(|| ApiError::not_found("user"))
}
