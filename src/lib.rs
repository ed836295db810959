//! Photographer notifier - texts an assigned photographer asking them to shoot a product.
//!
//! The crate is deployed as a single AWS Lambda. Each invocation:
//! 1. Lazily decrypts the Twilio credentials with KMS (once per container)
//! 2. Composes a short SMS from the product and photographer in the event
//! 3. Sends it through the Twilio REST API and echoes the event back
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use photographer_notifier::clients::{KmsDecrypter, SecretResolver};
//! use photographer_notifier::clients::twilio::twilio_factory;
//! use photographer_notifier::core::config::AppConfig;
//! use photographer_notifier::credentials::CredentialCache;
//! use photographer_notifier::handler::Notifier;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     photographer_notifier::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let resolver = SecretResolver::new(Arc::new(KmsDecrypter::from_env().await));
//!     let cache = CredentialCache::new(
//!         resolver,
//!         config.encrypted_account_sid.clone(),
//!         config.encrypted_auth_token.clone(),
//!         twilio_factory(config.twilio_api_base.clone()),
//!     );
//!     let notifier = Notifier::new(Arc::new(cache), config.twilio_number.clone());
//!
//!     let event = serde_json::from_str(r#"{
//!         "data": {"name": "Polo Ralph Lauren 3-Pack Socks"},
//!         "photographer": {"name": "Erik", "phone": "+15551234567"}
//!     }"#)?;
//!     notifier.handle(event).await?;
//!     Ok(())
//! }
//! ```

pub mod clients;
pub mod compose;
pub mod core;
pub mod credentials;
pub mod dispatch;
pub mod errors;
pub mod handler;

pub use errors::NotifyError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Sets up tracing-subscriber with a JSON formatter suitable for `CloudWatch`
/// Logs. Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// photographer_notifier::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
