#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use photographer_notifier::NotifyError;
use photographer_notifier::clients::SecretResolver;
use photographer_notifier::clients::kms::Decrypter;
use photographer_notifier::clients::twilio::{
    GatewayFactory, MessageGateway, MessageResource, TwilioApiError, TwilioError,
};
use photographer_notifier::core::models::{Credentials, OutboundMessage, PhotoRequestEvent};
use photographer_notifier::credentials::CredentialCache;

pub const ACCOUNT_SID_PLAINTEXT: &str = "AC0123456789";
pub const AUTH_TOKEN_PLAINTEXT: &str = "token-abc";

pub fn encrypted(plaintext: &str) -> String {
    BASE64_STANDARD.encode(format!("enc:{plaintext}"))
}

/// Strips the `enc:` prefix that [`encrypted`] adds; fails for one chosen plaintext.
#[derive(Default)]
pub struct FakeDecrypter {
    pub calls: AtomicUsize,
    pub fail_on: Option<String>,
}

impl FakeDecrypter {
    pub fn failing_on(plaintext: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: Some(plaintext.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Decrypter for FakeDecrypter {
    async fn decrypt(&self, ciphertext: Vec<u8>) -> Result<Vec<u8>, NotifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let text = String::from_utf8(ciphertext).expect("fake ciphertext is utf-8");
        let plaintext = text.strip_prefix("enc:").expect("fake ciphertext prefix");
        if self.fail_on.as_deref() == Some(plaintext) {
            return Err(NotifyError::AwsError(
                "AccessDeniedException: not authorized to use key".to_string(),
            ));
        }
        Ok(plaintext.as_bytes().to_vec())
    }
}

pub enum GatewayBehavior {
    Accept,
    Reject(TwilioApiError),
    Panic,
}

pub struct FakeGateway {
    pub credentials: Credentials,
    pub behavior: GatewayBehavior,
    pub sent: Mutex<Vec<OutboundMessage>>,
}

impl FakeGateway {
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageGateway for FakeGateway {
    async fn create_message(
        &self,
        message: &OutboundMessage,
    ) -> Result<MessageResource, TwilioError> {
        self.sent.lock().unwrap().push(message.clone());
        match &self.behavior {
            GatewayBehavior::Accept => Ok(MessageResource {
                sid: "SM0001".to_string(),
                status: "queued".to_string(),
                to: Some(message.to.clone()),
                from: Some(message.from.clone()),
                body: Some(message.body.clone()),
                date_created: Some("Mon, 19 Oct 2026 12:00:00 +0000".to_string()),
                date_sent: None,
                error_code: None,
                error_message: None,
            }),
            GatewayBehavior::Reject(api_error) => Err(TwilioError::Api(api_error.clone())),
            GatewayBehavior::Panic => panic!("gateway exploded"),
        }
    }
}

pub fn invalid_sender_error() -> TwilioApiError {
    TwilioApiError {
        code: Some(21212),
        message: "The 'From' number +15550000000 is not a valid phone number, shortcode, or alphanumeric sender ID.".to_string(),
        more_info: Some("https://www.twilio.com/docs/errors/21212".to_string()),
        status: 400,
    }
}

/// Records every gateway the cache builds so tests can inspect sends.
#[derive(Clone, Default)]
pub struct GatewayLog {
    pub built: Arc<Mutex<Vec<Arc<FakeGateway>>>>,
}

impl GatewayLog {
    pub fn builds(&self) -> usize {
        self.built.lock().unwrap().len()
    }

    pub fn total_sent(&self) -> usize {
        self.built.lock().unwrap().iter().map(|g| g.sent().len()).sum()
    }

    pub fn last(&self) -> Option<Arc<FakeGateway>> {
        self.built.lock().unwrap().last().cloned()
    }

    pub fn factory(&self, behavior: fn() -> GatewayBehavior) -> GatewayFactory {
        let built = Arc::clone(&self.built);
        Box::new(move |credentials: &Credentials| {
            let gateway = Arc::new(FakeGateway {
                credentials: credentials.clone(),
                behavior: behavior(),
                sent: Mutex::new(Vec::new()),
            });
            built.lock().unwrap().push(Arc::clone(&gateway));
            gateway as Arc<dyn MessageGateway>
        })
    }
}

pub fn cache_with(
    decrypter: Arc<FakeDecrypter>,
    log: &GatewayLog,
    behavior: fn() -> GatewayBehavior,
) -> CredentialCache {
    CredentialCache::new(
        SecretResolver::new(decrypter),
        encrypted(ACCOUNT_SID_PLAINTEXT),
        encrypted(AUTH_TOKEN_PLAINTEXT),
        log.factory(behavior),
    )
}

pub fn erik_event() -> PhotoRequestEvent {
    serde_json::from_value(serde_json::json!({
        "schema": "com.nordstrom/retail-stream/1-0-0",
        "origin": "hello-retail/product-producer-creator/uniqueId/friendlyName",
        "timestamp": 1_492_721_893_123_u64,
        "data": {
            "id": "4579874",
            "brand": "POLO RALPH LAUREN",
            "name": "Polo Ralph Lauren 3-Pack Socks",
            "description": "PAGE:/s/polo-ralph-lauren-3-pack-socks/4579874",
            "category": "Socks for Men"
        },
        "photographer": {
            "name": "Erik",
            "phone": "+15551234567"
        },
        "photographers": ["Erik"]
    }))
    .expect("valid event")
}
