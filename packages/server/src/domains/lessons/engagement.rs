//! Engagement state machine for reactions on a lesson.
//!
//! Each toggle reaction (like, favorite) is a two-state machine per
//! (lesson, actor): inactive <-> active, flipped on every invocation.
//! Comments and moderation flags are not toggles; comments always append,
//! flags always set.
//!
//! The transition functions here are pure: they look at the current
//! sub-state and decide the delta. The Postgres store re-evaluates the same
//! condition inside a single conditional UPDATE, and the in-memory store
//! applies these functions under a store-wide lock, so neither path can
//! interleave a read-check-write race.

use chrono::Utc;

use crate::domains::lessons::models::{Comment, FavoriteEntry, LessonRecord};

/// Marker recorded on each favorite entry.
pub const FAVORITE_MARKER: &str = "save";

/// Resulting state of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    Unliked,
}

impl LikeOutcome {
    pub fn as_status(&self) -> &'static str {
        match self {
            LikeOutcome::Liked => "liked",
            LikeOutcome::Unliked => "unliked",
        }
    }
}

/// Resulting state of a favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOutcome {
    NowSaved,
    NowUnsaved,
}

impl FavoriteOutcome {
    pub fn as_status(&self) -> &'static str {
        match self {
            FavoriteOutcome::NowSaved => "now-saved",
            FavoriteOutcome::NowUnsaved => "now-unsaved",
        }
    }
}

/// Moderation flags settable through the reaction surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationFlag {
    Reviewed,
    Featured(bool),
    Reported,
}

/// Flip the actor's like state in place, keeping `like_count == |liked_by|`.
///
/// The count is floored at zero so a stale row can never drive it negative.
pub fn apply_like(lesson: &mut LessonRecord, actor_email: &str) -> LikeOutcome {
    if let Some(pos) = lesson.liked_by.iter().position(|e| e == actor_email) {
        lesson.liked_by.remove(pos);
        lesson.like_count = (lesson.like_count - 1).max(0);
        LikeOutcome::Unliked
    } else {
        lesson.liked_by.push(actor_email.to_string());
        lesson.like_count += 1;
        LikeOutcome::Liked
    }
}

/// Flip the actor's favorite state in place.
///
/// `favorited_by` is an ordered sequence, not a set; at-most-one entry per
/// email is guaranteed by removing the matching entry before ever treating
/// the action as an add. `total_favorites` is floored at zero.
pub fn apply_favorite(lesson: &mut LessonRecord, actor_email: &str) -> FavoriteOutcome {
    let entries = &mut lesson.favorited_by.0;
    if let Some(pos) = entries.iter().position(|e| e.email == actor_email) {
        entries.remove(pos);
        lesson.total_favorites = (lesson.total_favorites - 1).max(0);
        FavoriteOutcome::NowUnsaved
    } else {
        entries.push(FavoriteEntry {
            email: actor_email.to_string(),
            marker: FAVORITE_MARKER.to_string(),
        });
        lesson.total_favorites += 1;
        FavoriteOutcome::NowSaved
    }
}

/// Append a comment, initializing the log if this is the first one.
pub fn apply_comment(lesson: &mut LessonRecord, comment: Comment) {
    lesson
        .comments
        .get_or_insert_with(|| sqlx::types::Json(Vec::new()))
        .0
        .push(comment);
}

/// Set a moderation flag unconditionally.
pub fn apply_flag(lesson: &mut LessonRecord, flag: ModerationFlag) {
    match flag {
        ModerationFlag::Reviewed => lesson.reviewed = true,
        ModerationFlag::Featured(value) => lesson.featured = value,
        ModerationFlag::Reported => lesson.reported = true,
    }
}

/// Build a comment stamped with the current time.
pub fn new_comment(actor_email: &str, text: &str, photo_url: Option<String>) -> Comment {
    Comment {
        author_email: actor_email.to_string(),
        photo_url,
        text: text.to_string(),
        posted_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::entity_ids::LessonId;
    use sqlx::types::Json;

    fn lesson() -> LessonRecord {
        LessonRecord {
            id: LessonId::new(),
            author_email: "a@x.com".to_string(),
            title: "Title".to_string(),
            body: "Body".to_string(),
            emotional_tone: "hopeful".to_string(),
            access_level: "public".to_string(),
            featured: false,
            reviewed: false,
            reported: false,
            like_count: 0,
            liked_by: vec![],
            total_favorites: 0,
            favorited_by: Json(vec![]),
            comments: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn like_toggle_pair_is_identity() {
        let mut l = lesson();
        assert_eq!(apply_like(&mut l, "b@x.com"), LikeOutcome::Liked);
        assert_eq!(l.like_count, 1);
        assert_eq!(l.liked_by, vec!["b@x.com".to_string()]);

        assert_eq!(apply_like(&mut l, "b@x.com"), LikeOutcome::Unliked);
        assert_eq!(l.like_count, 0);
        assert!(l.liked_by.is_empty());
    }

    #[test]
    fn like_count_tracks_set_size_over_any_sequence() {
        let mut l = lesson();
        let actors = ["a@x.com", "b@x.com", "a@x.com", "c@x.com", "b@x.com", "b@x.com"];
        for actor in actors {
            apply_like(&mut l, actor);
            assert_eq!(l.like_count as usize, l.liked_by.len());
        }
        // a toggled twice (off), b three times (on), c once (on)
        assert_eq!(l.liked_by, vec!["c@x.com".to_string(), "b@x.com".to_string()]);
    }

    #[test]
    fn like_count_floored_at_zero() {
        let mut l = lesson();
        // Inconsistent starting state: member present but count already zero.
        l.liked_by.push("b@x.com".to_string());
        assert_eq!(apply_like(&mut l, "b@x.com"), LikeOutcome::Unliked);
        assert_eq!(l.like_count, 0);
    }

    #[test]
    fn favorite_toggle_pair_is_identity() {
        let mut l = lesson();
        assert_eq!(apply_favorite(&mut l, "c@x.com"), FavoriteOutcome::NowSaved);
        assert_eq!(l.total_favorites, 1);
        assert_eq!(l.favorited_by.0[0].email, "c@x.com");
        assert_eq!(l.favorited_by.0[0].marker, FAVORITE_MARKER);

        assert_eq!(apply_favorite(&mut l, "c@x.com"), FavoriteOutcome::NowUnsaved);
        assert_eq!(l.total_favorites, 0);
        assert!(l.favorited_by.0.is_empty());
    }

    #[test]
    fn favorite_keeps_at_most_one_entry_per_email() {
        let mut l = lesson();
        for _ in 0..5 {
            apply_favorite(&mut l, "c@x.com");
        }
        let count = l.favorited_by.0.iter().filter(|e| e.email == "c@x.com").count();
        assert_eq!(count, 1);
        assert_eq!(l.total_favorites, 1);
    }

    #[test]
    fn total_favorites_never_negative() {
        let mut l = lesson();
        // Inconsistent starting state: entry present with a zero counter.
        l.favorited_by.0.push(FavoriteEntry {
            email: "c@x.com".to_string(),
            marker: FAVORITE_MARKER.to_string(),
        });
        apply_favorite(&mut l, "c@x.com");
        assert_eq!(l.total_favorites, 0);
    }

    #[test]
    fn outcome_labels_match_resulting_state() {
        let mut l = lesson();
        let saved = apply_favorite(&mut l, "c@x.com");
        assert_eq!(saved.as_status(), "now-saved");
        assert!(!l.favorited_by.0.is_empty());

        let unsaved = apply_favorite(&mut l, "c@x.com");
        assert_eq!(unsaved.as_status(), "now-unsaved");
        assert!(l.favorited_by.0.is_empty());
    }

    #[test]
    fn comments_initialize_then_append() {
        let mut l = lesson();
        assert!(l.comments.is_none());

        apply_comment(&mut l, new_comment("b@x.com", "first", None));
        apply_comment(&mut l, new_comment("b@x.com", "first", None));

        // Identical comments are all persisted: append-only log semantics.
        let log = l.comment_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].text, "first");
        assert_eq!(log[1].author_email, "b@x.com");
    }

    #[test]
    fn flags_set_unconditionally() {
        let mut l = lesson();
        apply_flag(&mut l, ModerationFlag::Reviewed);
        apply_flag(&mut l, ModerationFlag::Reported);
        apply_flag(&mut l, ModerationFlag::Featured(true));
        assert!(l.reviewed && l.reported && l.featured);

        apply_flag(&mut l, ModerationFlag::Featured(false));
        assert!(!l.featured);
        // reviewed/reported only ever set to true
        apply_flag(&mut l, ModerationFlag::Reviewed);
        assert!(l.reviewed);
    }
}
