//! Report actions - the moderation engine's validation and dedup pipeline.

use serde::Deserialize;

use crate::common::auth::Capability;
use crate::common::entity_ids::{LessonId, UserId};
use crate::common::errors::ApiError;
use crate::domains::reports::models::{NewReport, ReportCreateOutcome, ReportRecord};
use crate::domains::users::actions::resolve_actor;
use crate::domains::users::models::UserRecord;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Deserialize)]
pub struct FileReportInput {
    pub lesson_id: String,
    /// Reporter's store id, or their email when no id is at hand.
    pub reporter: String,
    pub reported_user_email: String,
    pub reason: String,
}

/// File a report against a lesson/author pair.
///
/// Pipeline: validate inputs, resolve the reporter (id or email), verify
/// the lesson, reject self-reports, then insert behind the dedup guard.
pub async fn file_report(
    input: FileReportInput,
    deps: &ServerDeps,
) -> Result<ReportRecord, ApiError> {
    for (value, field) in [
        (&input.lesson_id, "lesson id"),
        (&input.reporter, "reporter"),
        (&input.reported_user_email, "reported user email"),
        (&input.reason, "reason"),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::validation(format!("{field} is required")));
        }
    }

    let reporter = resolve_reporter(&input.reporter, deps).await?;

    let lesson_id = LessonId::parse(input.lesson_id.trim())
        .map_err(|_| ApiError::validation("lesson id is not a valid id"))?;
    if deps.lessons.find_by_id(lesson_id).await?.is_none() {
        return Err(ApiError::not_found("lesson"));
    }

    if reporter.email == input.reported_user_email {
        return Err(ApiError::SelfReport);
    }

    if deps
        .reports
        .exists_for(lesson_id, &input.reported_user_email)
        .await?
    {
        return Err(ApiError::DuplicateReport);
    }

    // The store re-checks under its unique constraint, so a racing
    // duplicate that slipped past the lookup still lands here.
    match deps
        .reports
        .insert(NewReport {
            lesson_id,
            reporter_user_id: reporter.id,
            reported_user_email: input.reported_user_email,
            reason: input.reason,
        })
        .await?
    {
        ReportCreateOutcome::Created(report) => Ok(report),
        ReportCreateOutcome::Duplicate => Err(ApiError::DuplicateReport),
    }
}

/// Unfiltered report listing, newest first (admin only).
pub async fn list_reports(
    actor_email: &str,
    deps: &ServerDeps,
) -> Result<Vec<ReportRecord>, ApiError> {
    let actor = resolve_actor(actor_email, deps).await?;
    actor.can(Capability::Admin).check()?;

    let reports = deps.reports.query_all().await?;
    Ok(reports)
}

/// Resolve the reporter identifier: a valid store id looks up by id, any
/// other string is treated as an email.
async fn resolve_reporter(identifier: &str, deps: &ServerDeps) -> Result<UserRecord, ApiError> {
    let identifier = identifier.trim();
    let user = match UserId::parse(identifier) {
        Ok(id) => deps.users.find_by_id(id).await?,
        Err(_) => deps.users.find_by_email(identifier).await?,
    };
    user.ok_or_else(|| ApiError::not_found("reporter"))
}
