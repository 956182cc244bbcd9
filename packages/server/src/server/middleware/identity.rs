//! Identity middleware and extractor.
//!
//! Extracts the bearer credential from the Authorization header, asks the
//! identity verifier for the verified email, and adds `AuthUser` to the
//! request extensions. Without a valid credential the request continues
//! unauthenticated; handlers that need an actor use the `Identity`
//! extractor, which rejects with an auth error.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::common::auth::AuthError;
use crate::common::errors::ApiError;
use crate::server::app::AppState;

/// Verified actor identity attached to a request.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: String,
}

pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(&request) {
        match state.identity.verify_email(&token).await {
            Ok(email) => {
                debug!(%email, "authenticated actor");
                request.extensions_mut().insert(AuthUser { email });
            }
            Err(_) => debug!("invalid authentication token"),
        }
    }
    next.run(request).await
}

fn bearer_token(request: &Request) -> Option<String> {
    let header = request.headers().get("authorization")?;
    let value = header.to_str().ok()?;
    // Accept both "Bearer <token>" and a raw token
    Some(value.strip_prefix("Bearer ").unwrap_or(value).to_string())
}

/// Extractor yielding the verified actor email, rejecting unauthenticated
/// requests with the auth error taxonomy.
pub struct Identity(pub String);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .map(|user| Identity(user.email.clone()))
            .ok_or(ApiError::Auth(AuthError::AuthenticationRequired))
    }
}
