//! Reports domain: the moderation pipeline.

pub mod actions;
pub mod models;
