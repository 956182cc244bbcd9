/// Capabilities gating mutations on the Life Lessons platform.
///
/// Every mutating operation names the capability it needs; the check runs
/// before any store write. Admins implicitly hold every capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// Actor must own the entity (matched by email).
    Owner { owner_email: String },

    /// Moderation operations: review/feature flags, report listing.
    Admin,

    /// Premium-gated content operations.
    Premium,
}

impl Capability {
    pub fn owner(owner_email: impl Into<String>) -> Self {
        Capability::Owner {
            owner_email: owner_email.into(),
        }
    }
}
