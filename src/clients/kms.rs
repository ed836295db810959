//! Secret resolution through AWS KMS
//!
//! Credentials arrive as base64 KMS ciphertext in the environment and are turned
//! into plaintext here. The KMS call sits behind [`Decrypter`] so the resolver
//! can be driven by any backend.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_kms::Client as KmsClient;
use aws_sdk_kms::primitives::Blob;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use tracing::{error, info};

use crate::errors::NotifyError;

pub const ACCOUNT_SID_FIELD: &str = "accountSid";
pub const AUTH_TOKEN_FIELD: &str = "authToken";

/// A secret-decryption service.
#[async_trait]
pub trait Decrypter: Send + Sync {
    async fn decrypt(&self, ciphertext: Vec<u8>) -> Result<Vec<u8>, NotifyError>;
}

pub struct KmsDecrypter {
    client: KmsClient,
}

impl KmsDecrypter {
    pub fn new(client: KmsClient) -> Self {
        Self { client }
    }

    /// Builds a KMS client from the ambient AWS environment (region, role credentials).
    pub async fn from_env() -> Self {
        let shared = aws_config::from_env().load().await;
        Self::new(KmsClient::new(&shared))
    }
}

#[async_trait]
impl Decrypter for KmsDecrypter {
    async fn decrypt(&self, ciphertext: Vec<u8>) -> Result<Vec<u8>, NotifyError> {
        let resp = self
            .client
            .decrypt()
            .ciphertext_blob(Blob::new(ciphertext))
            .send()
            .await?;

        resp.plaintext()
            .map(|blob| blob.as_ref().to_vec())
            .ok_or_else(|| NotifyError::AwsError("kms decrypt returned no plaintext".to_string()))
    }
}

/// Turns labelled ciphertext values into plaintext strings.
#[derive(Clone)]
pub struct SecretResolver {
    decrypter: Arc<dyn Decrypter>,
}

impl SecretResolver {
    pub fn new(decrypter: Arc<dyn Decrypter>) -> Self {
        Self { decrypter }
    }

    /// Decrypts one base64 ciphertext. Any failure is tagged with `field`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Resolver`] if the value is not base64, the service
    /// rejects it, or the plaintext is not UTF-8.
    pub async fn resolve(&self, ciphertext: &str, field: &str) -> Result<String, NotifyError> {
        let blob = BASE64_STANDARD.decode(ciphertext.trim()).map_err(|e| {
            error!(field, "resolve - ciphertext is not valid base64: {}", e);
            NotifyError::resolver(field, format!("invalid base64 ciphertext: {e}"))
        })?;

        let plaintext = self.decrypter.decrypt(blob).await.map_err(|e| {
            error!(field, "resolve - decryption failed: {}", e);
            NotifyError::resolver(field, e.to_string())
        })?;

        let value = String::from_utf8(plaintext).map_err(|e| {
            error!(field, "resolve - plaintext is not UTF-8: {}", e);
            NotifyError::resolver(field, format!("plaintext is not valid UTF-8: {e}"))
        })?;

        info!(field, "Decrypted secret");
        Ok(value)
    }
}
