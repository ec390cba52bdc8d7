use thiserror::Error;

/// Errors raised while sending a notification. Logged by [`dispatch`](super::dispatch),
/// never returned to the operation that caused the send.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotifyError {
    /// Neither an email address nor a phone number is on file.
    #[error("No recipient address for order #{0}")]
    MissingRecipient(String),

    #[error("Notification transport error: {0}")]
    Transport(String),
}
