//! User actions - entry-point functions for account operations.
//!
//! Actions are self-contained: they take raw input, validate it, run
//! capability checks, and return plain data for the HTTP layer.

use serde::Deserialize;

use crate::common::auth::{Actor, Capability};
use crate::common::errors::ApiError;
use crate::domains::users::models::{NewUser, ProfileChanges, UserCreateOutcome, UserRecord};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserInput {
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Validate that a required email field is present and plausible.
pub fn require_email(value: &str, field: &str) -> Result<(), ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    if !trimmed.contains('@') {
        return Err(ApiError::validation(format!("{field} must be an email")));
    }
    Ok(())
}

/// Resolve a verified email to an actor with role and premium flags.
///
/// An email the identity provider vouched for but that has no account yet
/// acts as a plain non-premium user.
pub async fn resolve_actor(actor_email: &str, deps: &ServerDeps) -> Result<Actor, ApiError> {
    require_email(actor_email, "actor email")?;
    let user = deps.users.find_by_email(actor_email).await?;
    Ok(match user {
        Some(user) => Actor::new(&user.email, user.is_admin(), user.is_premium),
        None => Actor::new(actor_email, false, false),
    })
}

/// Idempotent create-by-email: an existing account reports `AlreadyExists`
/// instead of erroring.
pub async fn register_user(
    input: RegisterUserInput,
    deps: &ServerDeps,
) -> Result<UserCreateOutcome, ApiError> {
    require_email(&input.email, "email")?;

    let outcome = deps
        .users
        .create_if_absent(NewUser {
            email: input.email.trim().to_string(),
            display_name: input.display_name,
            photo_url: input.photo_url,
        })
        .await?;
    Ok(outcome)
}

/// Selectively update a profile. Owners may change their own name and
/// photo; role changes are admin-only.
pub async fn update_user_profile(
    actor_email: &str,
    email: &str,
    changes: ProfileChanges,
    deps: &ServerDeps,
) -> Result<UserRecord, ApiError> {
    require_email(email, "email")?;
    let actor = resolve_actor(actor_email, deps).await?;
    actor.can(Capability::owner(email)).check()?;
    if changes.role.is_some() {
        actor.can(Capability::Admin).check()?;
    }

    deps.users
        .update_profile(email, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("user"))
}

/// Remove an account by email (owner or admin).
pub async fn remove_user(
    actor_email: &str,
    email: &str,
    deps: &ServerDeps,
) -> Result<(), ApiError> {
    require_email(email, "email")?;
    let actor = resolve_actor(actor_email, deps).await?;
    actor.can(Capability::owner(email)).check()?;

    if deps.users.delete_by_email(email).await? {
        Ok(())
    } else {
        Err(ApiError::not_found("user"))
    }
}
