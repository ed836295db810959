//! Twilio Programmable SMS client
//!
//! Only the message-create operation is implemented.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::core::config::DEFAULT_TWILIO_API_BASE;
use crate::core::models::{Credentials, OutboundMessage};

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Message resource returned by Twilio on a successful create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResource {
    pub sid: String,
    pub status: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_sent: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Structured error body Twilio returns with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TwilioApiError {
    #[serde(default)]
    pub code: Option<u32>,
    pub message: String,
    #[serde(default)]
    pub more_info: Option<String>,
    // Zero when the body omits it; filled from the HTTP status
    #[serde(default)]
    pub status: u16,
}

impl fmt::Display for TwilioApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (status {}", self.message, self.status)?;
        if let Some(code) = self.code {
            write!(f, ", code {code}")?;
        }
        if let Some(more_info) = &self.more_info {
            write!(f, ", see {more_info}")?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Error)]
pub enum TwilioError {
    #[error("{0}")]
    Api(TwilioApiError),

    #[error("Failed to send HTTP request: {0}")]
    Transport(String),

    #[error("Failed to parse Twilio response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for TwilioError {
    fn from(error: reqwest::Error) -> Self {
        TwilioError::Transport(error.to_string())
    }
}

/// A messaging gateway capable of sending one SMS.
#[async_trait]
pub trait MessageGateway: Send + Sync {
    async fn create_message(
        &self,
        message: &OutboundMessage,
    ) -> Result<MessageResource, TwilioError>;
}

/// Builds a gateway bound to freshly decrypted credentials.
pub type GatewayFactory = Box<dyn Fn(&Credentials) -> Arc<dyn MessageGateway> + Send + Sync>;

/// Factory producing [`TwilioClient`]s against `api_base`.
pub fn twilio_factory(api_base: String) -> GatewayFactory {
    Box::new(move |credentials: &Credentials| {
        Arc::new(TwilioClient::with_base_url(credentials.clone(), api_base.clone()))
            as Arc<dyn MessageGateway>
    })
}

pub struct TwilioClient {
    credentials: Credentials,
    base_url: String,
}

impl TwilioClient {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url(credentials, DEFAULT_TWILIO_API_BASE)
    }

    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Self {
        Self {
            credentials,
            base_url: base_url.into(),
        }
    }

    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.credentials.account_sid
        )
    }
}

#[async_trait]
impl MessageGateway for TwilioClient {
    async fn create_message(
        &self,
        message: &OutboundMessage,
    ) -> Result<MessageResource, TwilioError> {
        let params = [
            ("To", message.to.as_str()),
            ("From", message.from.as_str()),
            ("Body", message.body.as_str()),
        ];

        let resp = HTTP_CLIENT
            .post(self.messages_url())
            .basic_auth(&self.credentials.account_sid, Some(&self.credentials.auth_token))
            .form(&params)
            .send()
            .await?;

        let status = resp.status();
        let body_text = resp.text().await?;

        if !status.is_success() {
            let mut api_error = serde_json::from_str::<TwilioApiError>(&body_text)
                .unwrap_or_else(|_| TwilioApiError {
                    code: None,
                    message: body_text.clone(),
                    more_info: None,
                    status: status.as_u16(),
                });
            if api_error.status == 0 {
                api_error.status = status.as_u16();
            }
            error!(
                status = status.as_u16(),
                code = ?api_error.code,
                "Twilio message create failed: {}",
                api_error.message
            );
            return Err(TwilioError::Api(api_error));
        }

        let resource: MessageResource = serde_json::from_str(&body_text)
            .map_err(|e| TwilioError::InvalidResponse(e.to_string()))?;
        info!(sid = %resource.sid, status = %resource.status, "Twilio message created");
        Ok(resource)
    }
}
