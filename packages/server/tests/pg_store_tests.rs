//! Postgres-backed tests for the conditional-update SQL paths.
//!
//! These exercise the real statements behind the store traits: the
//! single-statement like/favorite toggles, the comment log initialization,
//! the report dedup index, and the set-once premium timestamp.
//!
//! Tests share one container and database; run them with
//! `cargo test -- --ignored` on a machine with Docker.

mod common;

use common::PgHarness;
use server_core::domains::lessons::engagement::{ModerationFlag, FAVORITE_MARKER};
use server_core::domains::lessons::models::{Comment, LessonRecord, NewLesson};
use server_core::domains::reports::models::{NewReport, ReportCreateOutcome, ReportRecord};
use server_core::domains::users::models::{NewUser, UserCreateOutcome, UserRecord};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

async fn seed_lesson(pool: &PgPool, author: &str) -> LessonRecord {
    LessonRecord::create(
        NewLesson {
            author_email: author.to_string(),
            title: "A lesson".to_string(),
            body: "Body".to_string(),
            emotional_tone: "hopeful".to_string(),
            access_level: "public".to_string(),
        },
        pool,
    )
    .await
    .expect("Failed to seed lesson")
}

async fn seed_user(pool: &PgPool, email: &str) -> UserRecord {
    match UserRecord::create_if_absent(
        NewUser {
            email: email.to_string(),
            display_name: None,
            photo_url: None,
        },
        pool,
    )
    .await
    .expect("Failed to seed user")
    {
        UserCreateOutcome::Created(user) => user,
        UserCreateOutcome::AlreadyExists => UserRecord::find_by_email(email, pool)
            .await
            .unwrap()
            .unwrap(),
    }
}

fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@x.com", Uuid::new_v4())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn like_toggle_flips_membership_and_count() {
    let harness = PgHarness::new().await;
    let lesson = seed_lesson(&harness.db_pool, &unique_email("author")).await;
    let reader = unique_email("reader");

    let liked = LessonRecord::toggle_like(lesson.id, &reader, &harness.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(liked.like_count, 1);
    assert_eq!(liked.liked_by, vec![reader.clone()]);

    let unliked = LessonRecord::toggle_like(lesson.id, &reader, &harness.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unliked.like_count, 0);
    assert!(unliked.liked_by.is_empty());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn concurrent_likes_from_distinct_actors_all_land() {
    let harness = PgHarness::new().await;
    let lesson = seed_lesson(&harness.db_pool, &unique_email("author")).await;

    let mut handles = Vec::new();
    for i in 0..10 {
        let pool = harness.db_pool.clone();
        let id = lesson.id;
        handles.push(tokio::spawn(async move {
            LessonRecord::toggle_like(id, &format!("reader{i}@x.com"), &pool).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap().unwrap();
    }

    let after = LessonRecord::find_by_id(lesson.id, &harness.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.like_count, 10);
    assert_eq!(after.like_count, after.liked_by.len() as i64);
    let mut unique = after.liked_by.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 10);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn favorite_toggle_rewrites_the_jsonb_sequence() {
    let harness = PgHarness::new().await;
    let lesson = seed_lesson(&harness.db_pool, &unique_email("author")).await;
    let first = unique_email("first");
    let second = unique_email("second");

    LessonRecord::toggle_favorite(lesson.id, &first, &harness.db_pool)
        .await
        .unwrap()
        .unwrap();
    let both = LessonRecord::toggle_favorite(lesson.id, &second, &harness.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(both.total_favorites, 2);
    assert_eq!(both.favorited_by.0[0].email, first);
    assert_eq!(both.favorited_by.0[0].marker, FAVORITE_MARKER);

    // Removing the first keeps the second's entry intact.
    let after = LessonRecord::toggle_favorite(lesson.id, &first, &harness.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.total_favorites, 1);
    assert_eq!(after.favorited_by.0.len(), 1);
    assert_eq!(after.favorited_by.0[0].email, second);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn comment_log_initializes_on_first_append() {
    let harness = PgHarness::new().await;
    let lesson = seed_lesson(&harness.db_pool, &unique_email("author")).await;
    assert!(lesson.comments.is_none());

    let comment = Comment {
        author_email: unique_email("reader"),
        photo_url: None,
        text: "First".to_string(),
        posted_at: Utc::now(),
    };
    let after = LessonRecord::append_comment(lesson.id, &comment, &harness.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.comment_log().len(), 1);
    assert_eq!(after.comment_log()[0].text, "First");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn moderation_flags_persist() {
    let harness = PgHarness::new().await;
    let lesson = seed_lesson(&harness.db_pool, &unique_email("author")).await;

    let reviewed = LessonRecord::set_flag(lesson.id, ModerationFlag::Reviewed, &harness.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert!(reviewed.reviewed);

    let featured =
        LessonRecord::set_flag(lesson.id, ModerationFlag::Featured(true), &harness.db_pool)
            .await
            .unwrap()
            .unwrap();
    assert!(featured.featured);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn report_dedup_index_turns_duplicates_into_outcome() {
    let harness = PgHarness::new().await;
    let author = unique_email("author");
    let lesson = seed_lesson(&harness.db_pool, &author).await;
    let reporter = seed_user(&harness.db_pool, &unique_email("reporter")).await;

    let new = NewReport {
        lesson_id: lesson.id,
        reporter_user_id: reporter.id,
        reported_user_email: author.clone(),
        reason: "Spam".to_string(),
    };
    let first = ReportRecord::create(new.clone(), &harness.db_pool)
        .await
        .unwrap();
    assert!(matches!(first, ReportCreateOutcome::Created(_)));

    let second = ReportRecord::create(new, &harness.db_pool).await.unwrap();
    assert!(matches!(second, ReportCreateOutcome::Duplicate));

    assert!(ReportRecord::exists_for(lesson.id, &author, &harness.db_pool)
        .await
        .unwrap());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn premium_timestamp_is_set_once() {
    let harness = PgHarness::new().await;
    let email = unique_email("member");
    seed_user(&harness.db_pool, &email).await;

    let first = UserRecord::grant_premium(&email, &harness.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert!(first.is_premium);
    let stamp = first.premium_at.unwrap();

    let second = UserRecord::grant_premium(&email, &harness.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.premium_at, Some(stamp));
}
