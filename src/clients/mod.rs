//! Client modules for external API interactions

pub mod kms;
pub mod twilio;

pub use kms::{Decrypter, KmsDecrypter, SecretResolver};
pub use twilio::{MessageGateway, TwilioClient};
