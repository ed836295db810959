use crate::core::models::{OutboundMessage, PhotoRequestEvent};

pub const INSTRUCTION_LINE: &str = "Please snap a pic of:";

/// Builds the SMS asking the assigned photographer to shoot the product.
pub fn compose(event: &PhotoRequestEvent, from: &str) -> OutboundMessage {
    OutboundMessage {
        to: event.photographer.phone.clone(),
        from: from.to_string(),
        body: [
            format!("Hello {}!", event.photographer.name),
            INSTRUCTION_LINE.to_string(),
            format!("  {}", event.data.name),
        ]
        .join("\n"),
    }
}
