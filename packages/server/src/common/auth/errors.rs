use thiserror::Error;

/// Authorization errors for the Life Lessons platform.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Admin access required")]
    AdminRequired,

    #[error("Premium subscription required")]
    PremiumRequired,

    #[error("Invalid or expired token")]
    InvalidToken,
}
