//! Shared types: typed ids, error taxonomy, pagination, authorization.

pub mod auth;
pub mod entity_ids;
pub mod errors;
pub mod id;
pub mod pagination;

pub use entity_ids::{LessonId, ReportId, UserId};
pub use errors::ApiError;
pub use pagination::{Page, PageArgs, ValidatedPageArgs};
