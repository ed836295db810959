use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Product to be photographed.
///
/// Only `name` is interpreted; id, brand, description, category and anything
/// else stay in `extra` exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photographer {
    pub name: String,
    pub phone: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload delivered to the Lambda when a photographer has been assigned to a product.
///
/// Provenance metadata (`schema`, `origin`, `timestamp`), the `photographers`
/// list and any other fields are kept untyped in `extra`, so the event echoed
/// back to the caller is the one that came in, nulls and all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRequestEvent {
    pub data: Product,
    pub photographer: Photographer,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PhotoRequestEvent {
    /// Top-level field outside the product and photographer, e.g. `schema`.
    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Plaintext messaging-gateway credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account_sid: String,
    pub auth_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub to: String,
    pub from: String,
    pub body: String,
}
