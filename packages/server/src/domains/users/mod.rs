//! Users domain: account records and profile operations.

pub mod actions;
pub mod models;
