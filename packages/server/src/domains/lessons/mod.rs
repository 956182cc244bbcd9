//! Lessons domain: the engagement target and its state machine.

pub mod actions;
pub mod discovery;
pub mod engagement;
pub mod models;
