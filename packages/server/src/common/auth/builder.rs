use super::{AuthError, Capability};

/// Entry point for authorization checks.
///
/// Usage:
/// ```
/// use server_core::common::auth::{Actor, Capability};
///
/// let actor = Actor::new("a@x.com", false, false);
/// actor.can(Capability::owner("a@x.com")).check().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Actor {
    email: String,
    is_admin: bool,
    is_premium: bool,
}

impl Actor {
    /// Create a new actor for authorization checks.
    ///
    /// `is_admin` and `is_premium` come from the actor's user record,
    /// resolved after the identity provider verified the email.
    pub fn new(email: impl Into<String>, is_admin: bool, is_premium: bool) -> Self {
        Self {
            email: email.into(),
            is_admin,
            is_premium,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Specify what capability the actor needs.
    pub fn can(&self, capability: Capability) -> CapabilityCheck<'_> {
        CapabilityCheck {
            actor: self,
            capability,
        }
    }
}

/// Pending check after specifying a capability.
pub struct CapabilityCheck<'a> {
    actor: &'a Actor,
    capability: Capability,
}

impl CapabilityCheck<'_> {
    /// Perform the authorization check.
    ///
    /// Admins pass every check; owner checks compare emails exactly.
    pub fn check(self) -> Result<(), AuthError> {
        if self.actor.is_admin {
            return Ok(());
        }
        match self.capability {
            Capability::Owner { ref owner_email } => {
                if self.actor.email == *owner_email {
                    Ok(())
                } else {
                    Err(AuthError::PermissionDenied(
                        "only the owner may perform this action".to_string(),
                    ))
                }
            }
            Capability::Admin => Err(AuthError::AdminRequired),
            Capability::Premium => {
                if self.actor.is_premium {
                    Ok(())
                } else {
                    Err(AuthError::PremiumRequired)
                }
            }
        }
    }
}
