/// Authorization module for the Life Lessons platform.
///
/// Provides a fluent API for capability checks in action code:
///
/// ```rust,ignore
/// use crate::common::auth::{Actor, Capability};
///
/// actor.can(Capability::owner(&lesson.author_email)).check()?;
/// ```
///
/// This keeps authorization in the action layer where it belongs, not in
/// the HTTP handlers.
mod builder;
mod capability;
mod errors;

pub use builder::{Actor, CapabilityCheck};
pub use capability::Capability;
pub use errors::AuthError;
