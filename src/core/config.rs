use std::env::{self, VarError};

use crate::errors::NotifyError;

pub const DEFAULT_TWILIO_API_BASE: &str = "https://api.twilio.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Assignment store; not read by the notifier itself
    pub assignments_table: String,
    /// Base64 KMS ciphertext of the Twilio account SID.
    pub encrypted_account_sid: String,
    /// Base64 KMS ciphertext of the Twilio auth token.
    pub encrypted_auth_token: String,
    pub twilio_number: String,
    pub twilio_api_base: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, NotifyError> {
        Self::from_lookup(|key| env::var(key))
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NotifyError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let required = |key: &str| {
            lookup(key).map_err(|e| NotifyError::Config(format!("{}: {}", key, e)))
        };

        Ok(Self {
            assignments_table: required("ASSIGNMENTS_TABLE")?,
            encrypted_account_sid: required("TWILIO_ACCOUNT_SID")?,
            encrypted_auth_token: required("TWILIO_AUTH_TOKEN")?,
            twilio_number: required("TWILIO_NUMBER")?,
            twilio_api_base: lookup("TWILIO_API_BASE")
                .unwrap_or_else(|_| DEFAULT_TWILIO_API_BASE.to_string()),
        })
    }
}
