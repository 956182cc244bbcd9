//! Report pipeline tests: validation, reporter resolution, self-report
//! rejection, dedup, and the admin-only listing.

mod common;

use common::{create_lesson, make_admin, register, TestHarness};
use server_core::common::errors::ApiError;
use server_core::domains::reports::actions::{file_report, list_reports, FileReportInput};
use server_core::domains::reports::models::STATUS_PENDING;
use uuid::Uuid;

fn report_input(lesson_id: &str, reporter: &str, reported: &str) -> FileReportInput {
    FileReportInput {
        lesson_id: lesson_id.to_string(),
        reporter: reporter.to_string(),
        reported_user_email: reported.to_string(),
        reason: "Inappropriate content".to_string(),
    }
}

#[tokio::test]
async fn report_is_filed_with_pending_status() {
    let harness = TestHarness::new();
    let reporter = register(&harness.deps, "reporter@x.com").await;
    register(&harness.deps, "author@x.com").await;
    let lesson = create_lesson(&harness.deps, "author@x.com", "Spam", "angry").await;

    let report = file_report(
        report_input(&lesson.id.to_string(), "reporter@x.com", "author@x.com"),
        &harness.deps,
    )
    .await
    .unwrap();

    assert_eq!(report.lesson_id, lesson.id);
    assert_eq!(report.reporter_user_id, reporter.id);
    assert_eq!(report.reported_user_email, "author@x.com");
    assert_eq!(report.status, STATUS_PENDING);
}

#[tokio::test]
async fn reporter_resolves_by_id_as_well_as_email() {
    let harness = TestHarness::new();
    let reporter = register(&harness.deps, "reporter@x.com").await;
    register(&harness.deps, "author@x.com").await;
    let lesson = create_lesson(&harness.deps, "author@x.com", "Spam", "angry").await;

    let report = file_report(
        report_input(
            &lesson.id.to_string(),
            &reporter.id.to_string(),
            "author@x.com",
        ),
        &harness.deps,
    )
    .await
    .unwrap();
    assert_eq!(report.reporter_user_id, reporter.id);
}

#[tokio::test]
async fn duplicate_pair_rejected_even_from_another_reporter() {
    let harness = TestHarness::new();
    register(&harness.deps, "reporter@x.com").await;
    register(&harness.deps, "second@x.com").await;
    register(&harness.deps, "author@x.com").await;
    let lesson = create_lesson(&harness.deps, "author@x.com", "Spam", "angry").await;
    let id = lesson.id.to_string();

    file_report(
        report_input(&id, "reporter@x.com", "author@x.com"),
        &harness.deps,
    )
    .await
    .unwrap();

    let same_reporter =
        file_report(report_input(&id, "reporter@x.com", "author@x.com"), &harness.deps).await;
    assert!(matches!(same_reporter, Err(ApiError::DuplicateReport)));

    // Dedup keys on (lesson, reported user), not on who reported.
    let other_reporter =
        file_report(report_input(&id, "second@x.com", "author@x.com"), &harness.deps).await;
    assert!(matches!(other_reporter, Err(ApiError::DuplicateReport)));
}

#[tokio::test]
async fn same_reported_user_on_another_lesson_is_fine() {
    let harness = TestHarness::new();
    register(&harness.deps, "reporter@x.com").await;
    register(&harness.deps, "author@x.com").await;
    let first = create_lesson(&harness.deps, "author@x.com", "Spam one", "angry").await;
    let second = create_lesson(&harness.deps, "author@x.com", "Spam two", "angry").await;

    file_report(
        report_input(&first.id.to_string(), "reporter@x.com", "author@x.com"),
        &harness.deps,
    )
    .await
    .unwrap();
    file_report(
        report_input(&second.id.to_string(), "reporter@x.com", "author@x.com"),
        &harness.deps,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn self_report_rejected_before_dedup() {
    let harness = TestHarness::new();
    register(&harness.deps, "author@x.com").await;
    let lesson = create_lesson(&harness.deps, "author@x.com", "Mine", "calm").await;
    let id = lesson.id.to_string();

    let first = file_report(report_input(&id, "author@x.com", "author@x.com"), &harness.deps).await;
    assert!(matches!(first, Err(ApiError::SelfReport)));

    // Still a self-report on retry, never a duplicate.
    let again =
        file_report(report_input(&id, "author@x.com", "author@x.com"), &harness.deps).await;
    assert!(matches!(again, Err(ApiError::SelfReport)));
}

#[tokio::test]
async fn unknown_reporter_is_not_found() {
    let harness = TestHarness::new();
    register(&harness.deps, "author@x.com").await;
    let lesson = create_lesson(&harness.deps, "author@x.com", "Spam", "angry").await;

    let result = file_report(
        report_input(&lesson.id.to_string(), "ghost@x.com", "author@x.com"),
        &harness.deps,
    )
    .await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn unknown_lesson_is_not_found() {
    let harness = TestHarness::new();
    register(&harness.deps, "reporter@x.com").await;

    let result = file_report(
        report_input(&Uuid::new_v4().to_string(), "reporter@x.com", "author@x.com"),
        &harness.deps,
    )
    .await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn malformed_lesson_id_is_a_validation_error() {
    let harness = TestHarness::new();
    register(&harness.deps, "reporter@x.com").await;

    let result = file_report(
        report_input("not-a-uuid", "reporter@x.com", "author@x.com"),
        &harness.deps,
    )
    .await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn every_field_is_required() {
    let harness = TestHarness::new();

    for input in [
        report_input("", "reporter@x.com", "author@x.com"),
        report_input("some-id", "  ", "author@x.com"),
        report_input("some-id", "reporter@x.com", ""),
        FileReportInput {
            reason: " ".to_string(),
            ..report_input("some-id", "reporter@x.com", "author@x.com")
        },
    ] {
        let result = file_report(input, &harness.deps).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}

#[tokio::test]
async fn listing_reports_is_admin_only() {
    let harness = TestHarness::new();
    register(&harness.deps, "reporter@x.com").await;
    register(&harness.deps, "mod@x.com").await;
    make_admin(&harness.deps, "mod@x.com").await;
    register(&harness.deps, "author@x.com").await;
    let lesson = create_lesson(&harness.deps, "author@x.com", "Spam", "angry").await;

    file_report(
        report_input(&lesson.id.to_string(), "reporter@x.com", "author@x.com"),
        &harness.deps,
    )
    .await
    .unwrap();

    let denied = list_reports("reporter@x.com", &harness.deps).await;
    assert!(matches!(denied, Err(ApiError::Auth(_))));

    let reports = list_reports("mod@x.com", &harness.deps).await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].reported_user_email, "author@x.com");
}
