//! Hosted checkout client for the external payment processor.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::kernel::traits::{BaseCheckoutProvider, CheckoutSession};

#[derive(Debug, Serialize)]
struct CreateSessionRequest<'a> {
    customer_email: &'a str,
    amount_cents: i64,
    currency: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateSessionResponse {
    url: String,
}

/// reqwest-backed client for the processor's hosted checkout API.
///
/// The processor returns a redirect URL; completion is confirmed later
/// through the separate premium-confirmation call, never tracked here.
pub struct HostedCheckoutClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HostedCheckoutClient {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl BaseCheckoutProvider for HostedCheckoutClient {
    async fn create_checkout(
        &self,
        customer_email: &str,
        amount_cents: i64,
    ) -> Result<CheckoutSession> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&CreateSessionRequest {
                customer_email,
                amount_cents,
                currency: "usd",
            })
            .send()
            .await
            .context("Failed to reach checkout provider")?
            .error_for_status()
            .context("Checkout provider rejected session creation")?;

        let session: CreateSessionResponse = response
            .json()
            .await
            .context("Checkout provider returned an invalid session payload")?;

        Ok(CheckoutSession { url: session.url })
    }
}
