//! Environment configuration
//!
//! All deployment knobs come from environment variables, matching the
//! hosting platform's configuration model.

use booking::paypal::PayPalConfig;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// The single admin identity, lowercased for comparison
    pub admin_email: String,
    /// Shared secret the identity provider signs tokens with
    pub jwt_secret: String,
    pub paypal: PayPalConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                message: format!("{e}"),
            })?;

        let admin_email = require("ADMIN_EMAIL")?.to_lowercase();
        let jwt_secret = require("IDENTITY_JWT_SECRET")?;

        let paypal_env = env::var("PAYPAL_ENV").unwrap_or_else(|_| "live".to_string());
        let base_url = env::var("PAYPAL_BASE_URL")
            .unwrap_or_else(|_| PayPalConfig::base_url_for_env(&paypal_env).to_string());
        let paypal = PayPalConfig {
            base_url,
            client_id: require("PAYPAL_CLIENT_ID")?,
            secret: require("PAYPAL_SECRET")?,
        };

        Ok(Self {
            bind_addr,
            admin_email,
            jwt_secret,
            paypal,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}
