//! Process-wide credential cache
//!
//! Holds the decrypted Twilio credentials and the client built from them for the
//! lifetime of the Lambda container. Initialization is single-flight: concurrent
//! callers during a cold start wait on one decryption instead of racing. A failed
//! attempt leaves the cache empty so the next invocation tries again.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::clients::kms::{ACCOUNT_SID_FIELD, AUTH_TOKEN_FIELD, SecretResolver};
use crate::clients::twilio::{GatewayFactory, MessageGateway};
use crate::core::models::Credentials;
use crate::errors::NotifyError;

struct Ready {
    credentials: Credentials,
    gateway: Arc<dyn MessageGateway>,
}

pub struct CredentialCache {
    resolver: SecretResolver,
    encrypted_account_sid: String,
    encrypted_auth_token: String,
    factory: GatewayFactory,
    state: OnceCell<Ready>,
}

impl CredentialCache {
    pub fn new(
        resolver: SecretResolver,
        encrypted_account_sid: impl Into<String>,
        encrypted_auth_token: impl Into<String>,
        factory: GatewayFactory,
    ) -> Self {
        Self {
            resolver,
            encrypted_account_sid: encrypted_account_sid.into(),
            encrypted_auth_token: encrypted_auth_token.into(),
            factory,
            state: OnceCell::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state.initialized()
    }

    /// Decrypts credentials and builds the messaging client unless that already
    /// happened, then hands `event` straight back.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Initialization`] wrapping the first decryption
    /// failure. The cache stays uninitialized in that case.
    pub async fn ensure_initialized<'e, E: ?Sized>(&self, event: &'e E) -> Result<&'e E, NotifyError> {
        if self.state.initialized() {
            return Ok(event);
        }

        self.state
            .get_or_try_init(|| self.initialize())
            .await
            .map_err(|e| {
                error!("{}", e);
                e
            })?;

        Ok(event)
    }

    /// The messaging client, once initialization has succeeded.
    pub fn gateway(&self) -> Result<Arc<dyn MessageGateway>, NotifyError> {
        self.state
            .get()
            .map(|ready| Arc::clone(&ready.gateway))
            .ok_or(NotifyError::NotInitialized)
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.state.get().map(|ready| &ready.credentials)
    }

    async fn initialize(&self) -> Result<Ready, NotifyError> {
        info!("Decrypting messaging credentials");

        let (account_sid, auth_token) = tokio::try_join!(
            self.resolver.resolve(&self.encrypted_account_sid, ACCOUNT_SID_FIELD),
            self.resolver.resolve(&self.encrypted_auth_token, AUTH_TOKEN_FIELD),
        )
        .map_err(|e| NotifyError::Initialization(Box::new(e)))?;

        let credentials = Credentials {
            account_sid,
            auth_token,
        };
        let gateway = (self.factory)(&credentials);
        info!("Messaging client initialized");

        Ok(Ready {
            credentials,
            gateway,
        })
    }
}
