use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::sync::Once;

use thiserror::Error;

use crate::clients::twilio::TwilioError;

/// Every failure the notifier can surface to the Lambda runtime.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Error decrypting '{field}': {message}")]
    Resolver { field: String, message: String },

    #[error("ensureAuthTokenDecrypted - {0}")]
    Initialization(Box<NotifyError>),

    #[error("ensureAuthTokenDecrypted - messaging client is not initialized")]
    NotInitialized,

    #[error("sendMessage - Error sending message to photographer via Twilio: {0}")]
    Dispatch(TwilioError),

    #[error("Unexpected fault: {message}\n{backtrace}")]
    Unexpected { message: String, backtrace: String },

    #[error("Failed to interact with AWS services: {0}")]
    AwsError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NotifyError {
    pub fn resolver(field: &str, message: impl Into<String>) -> Self {
        NotifyError::Resolver {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Builds an `Unexpected` error from a caught panic payload.
    ///
    /// Uses the backtrace recorded at the panic site when [`install_panic_hook`]
    /// is active, and one captured here otherwise.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());

        let backtrace = take_panic_backtrace()
            .unwrap_or_else(|| Backtrace::force_capture().to_string());

        NotifyError::Unexpected { message, backtrace }
    }
}

thread_local! {
    static PANIC_BACKTRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Chains a panic hook that records where the panic happened and its backtrace
/// for the current thread. The previously installed hook still runs.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                .unwrap_or_else(|| "<unknown>".to_string());
            let record = format!("panicked at {location}\n{}", Backtrace::force_capture());
            PANIC_BACKTRACE.with(|slot| *slot.borrow_mut() = Some(record));
            previous(info);
        }));
    });
}

/// Drops any backtrace left over from a panic nobody converted.
pub fn clear_panic_backtrace() {
    PANIC_BACKTRACE.with(|slot| slot.borrow_mut().take());
}

fn take_panic_backtrace() -> Option<String> {
    PANIC_BACKTRACE.with(|slot| slot.borrow_mut().take())
}

// Generic implementation for AWS SDK errors
impl<E> From<aws_sdk_kms::error::SdkError<E>> for NotifyError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: aws_sdk_kms::error::SdkError<E>) -> Self {
        NotifyError::AwsError(aws_sdk_kms::error::DisplayErrorContext(&error).to_string())
    }
}
