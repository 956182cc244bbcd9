//! JWT-backed identity verification.
//!
//! The platform delegates authentication to an external identity provider;
//! what arrives here is a signed token whose `sub` claim carries the
//! verified email. This service only checks the signature, issuer, and
//! expiry, and hands the email to the rest of the core.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::common::auth::AuthError;
use crate::kernel::traits::BaseIdentityVerifier;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Verified email of the actor.
    pub sub: String,
    pub iss: String,
    pub exp: i64,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Create a token for an email (used by tooling and tests; production
    /// tokens come from the identity provider sharing the same secret).
    pub fn create_token(&self, email: &str) -> Result<String, AuthError> {
        let claims = Claims {
            sub: email.to_string(),
            iss: self.issuer.clone(),
            exp: (Utc::now() + Duration::hours(24)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::InvalidToken)
    }

    pub fn verify_token(&self, token: &str) -> Result<String, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;
        Ok(data.claims.sub)
    }
}

#[async_trait]
impl BaseIdentityVerifier for JwtService {
    async fn verify_email(&self, credential: &str) -> Result<String, AuthError> {
        self.verify_token(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_yields_email() {
        let service = JwtService::new("test_secret", "life-lessons".to_string());
        let token = service.create_token("a@x.com").unwrap();
        assert_eq!(service.verify_token(&token).unwrap(), "a@x.com");
    }

    #[test]
    fn wrong_issuer_rejected() {
        let issuing = JwtService::new("test_secret", "someone-else".to_string());
        let verifying = JwtService::new("test_secret", "life-lessons".to_string());
        let token = issuing.create_token("a@x.com").unwrap();
        assert!(matches!(
            verifying.verify_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_token_rejected() {
        let service = JwtService::new("test_secret", "life-lessons".to_string());
        assert!(matches!(
            service.verify_token("not-a-jwt"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn wrong_secret_rejected() {
        let issuing = JwtService::new("secret_a", "life-lessons".to_string());
        let verifying = JwtService::new("secret_b", "life-lessons".to_string());
        let token = issuing.create_token("a@x.com").unwrap();
        assert!(verifying.verify_token(&token).is_err());
    }
}
