//! Lambda handler: initialize credentials, compose the SMS, dispatch it.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use lambda_runtime::{Error, LambdaEvent};
use tracing::{error, info};

use crate::compose::compose;
use crate::core::models::PhotoRequestEvent;
use crate::credentials::CredentialCache;
use crate::dispatch;
use crate::errors::{self, NotifyError};

/// Prefix on every failure reported to the Lambda runtime.
pub const MODULE_TAG: &str = "photographer-notifier";

pub struct Notifier {
    cache: Arc<CredentialCache>,
    sender_number: String,
}

impl Notifier {
    pub fn new(cache: Arc<CredentialCache>, sender_number: impl Into<String>) -> Self {
        errors::install_panic_hook();
        Self {
            cache,
            sender_number: sender_number.into(),
        }
    }

    pub fn cache(&self) -> &CredentialCache {
        &self.cache
    }

    /// Runs one invocation and returns the event unchanged on success.
    ///
    /// Panics raised anywhere in the pipeline are caught and reported as
    /// [`NotifyError::Unexpected`].
    ///
    /// # Errors
    ///
    /// Returns the first failure from initialization or dispatch.
    pub async fn handle(&self, event: PhotoRequestEvent) -> Result<PhotoRequestEvent, NotifyError> {
        errors::clear_panic_backtrace();
        AssertUnwindSafe(self.process(event))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let err = NotifyError::from_panic(panic);
                error!("handler - {}", err);
                Err(err)
            })
    }

    async fn process(&self, event: PhotoRequestEvent) -> Result<PhotoRequestEvent, NotifyError> {
        info!(
            schema = ?event.metadata("schema"),
            origin = ?event.metadata("origin"),
            "Received photo request event: {:?}",
            event
        );

        self.cache.ensure_initialized(&event).await?;
        let gateway = self.cache.gateway()?;

        let message = compose(&event, &self.sender_number);
        let response = dispatch::send(gateway.as_ref(), &message).await?;
        info!(
            sid = %response.sid,
            status = %response.status,
            "Photo request delivered: {:?}",
            response
        );

        Ok(event)
    }
}

/// Lambda entrypoint. Echoes the event on success; on failure returns a single
/// error string tagged with [`MODULE_TAG`].
///
/// # Errors
///
/// Returns a runtime error when any stage of the invocation fails.
#[tracing::instrument(level = "info", skip(notifier, event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(
    notifier: &Notifier,
    event: LambdaEvent<PhotoRequestEvent>,
) -> Result<PhotoRequestEvent, Error> {
    notifier.handle(event.payload).await.map_err(|e| {
        error!("Invocation failed: {}", e);
        Error::from(format!("{MODULE_TAG} - {e}"))
    })
}

pub use self::function_handler as handler;
