use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::common::entity_ids::UserId;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// User model - SQL persistence layer.
///
/// The email is the unique, immutable identity; the UUID primary key is
/// the storage handle other aggregates reference.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub role: String,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub premium_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Fields for creating a user. Role and premium default server-side.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Selective profile changes; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Option<String>,
}

/// Result of an idempotent create-by-email.
#[derive(Debug, Clone)]
pub enum UserCreateOutcome {
    Created(UserRecord),
    AlreadyExists,
}

impl UserRecord {
    /// Insert-if-absent by unique email.
    ///
    /// A second creation attempt with an existing email is a no-op that
    /// reports `AlreadyExists` rather than erroring.
    pub async fn create_if_absent(new: NewUser, pool: &PgPool) -> Result<UserCreateOutcome> {
        let inserted = sqlx::query_as::<_, Self>(
            "INSERT INTO users (id, email, display_name, photo_url, role, is_premium)
             VALUES ($1, $2, $3, $4, $5, FALSE)
             ON CONFLICT (email) DO NOTHING
             RETURNING *",
        )
        .bind(UserId::new())
        .bind(new.email)
        .bind(new.display_name)
        .bind(new.photo_url)
        .bind(ROLE_USER)
        .fetch_optional(pool)
        .await?;

        Ok(match inserted {
            Some(user) => UserCreateOutcome::Created(user),
            None => UserCreateOutcome::AlreadyExists,
        })
    }

    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Apply provided profile fields, leaving the rest unchanged.
    pub async fn update_profile(
        email: &str,
        changes: ProfileChanges,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE users
             SET display_name = COALESCE($2, display_name),
                 photo_url = COALESCE($3, photo_url),
                 role = COALESCE($4, role)
             WHERE email = $1
             RETURNING *",
        )
        .bind(email)
        .bind(changes.display_name)
        .bind(changes.photo_url)
        .bind(changes.role)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete_by_email(email: &str, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip the premium flag. `premium_at` is set once, on first upgrade.
    pub async fn grant_premium(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE users
             SET is_premium = TRUE,
                 premium_at = COALESCE(premium_at, NOW())
             WHERE email = $1
             RETURNING *",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
