//! Test fixtures built on the action layer.

use server_core::domains::lessons::actions::{self as lesson_actions, CreateLessonInput};
use server_core::domains::lessons::models::LessonRecord;
use server_core::domains::users::actions::{register_user, RegisterUserInput};
use server_core::domains::users::models::{
    ProfileChanges, UserCreateOutcome, UserRecord, ROLE_ADMIN,
};
use server_core::kernel::ServerDeps;

/// Register a user, returning the record whether it was just created or
/// already present.
pub async fn register(deps: &ServerDeps, email: &str) -> UserRecord {
    let outcome = register_user(
        RegisterUserInput {
            email: email.to_string(),
            display_name: None,
            photo_url: None,
        },
        deps,
    )
    .await
    .expect("Failed to register user");

    match outcome {
        UserCreateOutcome::Created(user) => user,
        UserCreateOutcome::AlreadyExists => deps
            .users
            .find_by_email(email)
            .await
            .expect("Failed to look up user")
            .expect("User must exist after AlreadyExists"),
    }
}

/// Promote an existing user to admin, bypassing the capability gate.
pub async fn make_admin(deps: &ServerDeps, email: &str) {
    deps.users
        .update_profile(
            email,
            ProfileChanges {
                role: Some(ROLE_ADMIN.to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update role")
        .expect("User must exist to become admin");
}

/// Create a public lesson authored by `author`.
pub async fn create_lesson(
    deps: &ServerDeps,
    author: &str,
    title: &str,
    tone: &str,
) -> LessonRecord {
    lesson_actions::create_lesson(
        author,
        CreateLessonInput {
            title: title.to_string(),
            body: format!("Body of {title}"),
            emotional_tone: tone.to_string(),
            access_level: None,
        },
        deps,
    )
    .await
    .expect("Failed to create lesson")
}
