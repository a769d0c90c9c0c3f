//! Thank-you notification collaborator. The transfer path treats this as
//! best-effort: a failed send is logged by the caller and never changes a
//! transfer's outcome.

mod config;
mod mailer;

use async_trait::async_trait;
use thiserror::Error;

pub use config::SmtpConfig;
pub use mailer::{NoopNotifier, SmtpNotifier};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid notification config: {0}")]
    Config(String),
    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),
    #[error("SMTP transport error: {0}")]
    Transport(String),
    #[error("Failed to send: {0}")]
    Send(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the one-time thank-you message to the donor's registered
    /// address.
    async fn send_thank_you(&self, recipient: &str) -> Result<(), NotifyError>;
}
