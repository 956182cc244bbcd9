//! Entity ID aliases for the platform's aggregates.

use crate::common::id::Id;

pub struct Lesson;
pub type LessonId = Id<Lesson>;

pub struct User;
pub type UserId = Id<User>;

pub struct Report;
pub type ReportId = Id<Report>;
