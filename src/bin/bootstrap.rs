// Lambda bootstrap entry point for the photographer notifier

use std::sync::Arc;

use lambda_runtime::{Error, run, service_fn};
use photographer_notifier::clients::twilio::twilio_factory;
use photographer_notifier::clients::{KmsDecrypter, SecretResolver};
use photographer_notifier::core::config::AppConfig;
use photographer_notifier::credentials::CredentialCache;
use photographer_notifier::handler::{Notifier, function_handler};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    photographer_notifier::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("{}", e);
        Error::from(e.to_string())
    })?;
    info!(
        assignments_table = %config.assignments_table,
        twilio_api_base = %config.twilio_api_base,
        "Photographer notifier cold start"
    );

    // Credentials are decrypted lazily on the first invocation, not here
    let resolver = SecretResolver::new(Arc::new(KmsDecrypter::from_env().await));
    let cache = CredentialCache::new(
        resolver,
        config.encrypted_account_sid.clone(),
        config.encrypted_auth_token.clone(),
        twilio_factory(config.twilio_api_base.clone()),
    );
    let notifier = Notifier::new(Arc::new(cache), config.twilio_number.clone());

    run(service_fn(|event| function_handler(&notifier, event))).await
}
