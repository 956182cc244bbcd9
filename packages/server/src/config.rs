use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub checkout_endpoint: String,
    pub checkout_api_key: String,
    /// Price of the premium subscription, in cents.
    pub premium_price_cents: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER")
                .unwrap_or_else(|_| "life-lessons".to_string()),
            checkout_endpoint: env::var("CHECKOUT_ENDPOINT")
                .context("CHECKOUT_ENDPOINT must be set")?,
            checkout_api_key: env::var("CHECKOUT_API_KEY")
                .context("CHECKOUT_API_KEY must be set")?,
            premium_price_cents: env::var("PREMIUM_PRICE_CENTS")
                .unwrap_or_else(|_| "999".to_string())
                .parse()
                .context("PREMIUM_PRICE_CENTS must be a valid number")?,
        })
    }
}
