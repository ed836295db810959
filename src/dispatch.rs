use tracing::{error, info};

use crate::clients::twilio::{MessageGateway, MessageResource};
use crate::core::models::OutboundMessage;
use crate::errors::NotifyError;

/// Sends one composed message through the gateway. Never retried.
///
/// # Errors
///
/// Returns [`NotifyError::Dispatch`] wrapping whatever the gateway reported.
pub async fn send(
    gateway: &dyn MessageGateway,
    message: &OutboundMessage,
) -> Result<MessageResource, NotifyError> {
    info!(to = %message.to, from = %message.from, "Sending photo request SMS");

    match gateway.create_message(message).await {
        Ok(resource) => Ok(resource),
        Err(e) => {
            let err = NotifyError::Dispatch(e);
            error!("{}", err);
            Err(err)
        }
    }
}
