use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::common::entity_ids::{LessonId, ReportId, UserId};

pub const STATUS_PENDING: &str = "pending";

/// Report model - SQL persistence layer.
///
/// The core only creates reports; resolution and dismissal happen in an
/// external moderation tool, so no mutation queries live here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportRecord {
    pub id: ReportId,
    pub lesson_id: LessonId,
    pub reporter_user_id: UserId,
    pub reported_user_email: String,
    pub reason: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for filing a report. Status and timestamp are server-assigned.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub lesson_id: LessonId,
    pub reporter_user_id: UserId,
    pub reported_user_email: String,
    pub reason: String,
}

/// Result of a report insert guarded by the dedup index.
#[derive(Debug, Clone)]
pub enum ReportCreateOutcome {
    Created(ReportRecord),
    Duplicate,
}

impl ReportRecord {
    /// Insert a pending report.
    ///
    /// The unique index on (lesson_id, reported_user_email) turns a racing
    /// duplicate into `Duplicate` instead of a second row.
    pub async fn create(new: NewReport, pool: &PgPool) -> Result<ReportCreateOutcome> {
        let inserted = sqlx::query_as::<_, Self>(
            "INSERT INTO reports (id, lesson_id, reporter_user_id, reported_user_email, reason, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (lesson_id, reported_user_email) DO NOTHING
             RETURNING *",
        )
        .bind(ReportId::new())
        .bind(new.lesson_id)
        .bind(new.reporter_user_id)
        .bind(new.reported_user_email)
        .bind(new.reason)
        .bind(STATUS_PENDING)
        .fetch_optional(pool)
        .await?;

        Ok(match inserted {
            Some(report) => ReportCreateOutcome::Created(report),
            None => ReportCreateOutcome::Duplicate,
        })
    }

    pub async fn exists_for(
        lesson_id: LessonId,
        reported_user_email: &str,
        pool: &PgPool,
    ) -> Result<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                 SELECT 1 FROM reports
                 WHERE lesson_id = $1 AND reported_user_email = $2
             )",
        )
        .bind(lesson_id)
        .bind(reported_user_email)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    pub async fn query_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM reports ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}
