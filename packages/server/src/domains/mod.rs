//! Domain modules: users, lessons, reports, billing.

pub mod billing;
pub mod lessons;
pub mod reports;
pub mod users;
