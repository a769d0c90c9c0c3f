use secrecy::{ExposeSecret, SecretString};
use std::env;

use crate::NotifyError;

/// SMTP settings for the thank-you mailer.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    /// Sender address; defaults to the username.
    pub from_address: String,
    password: SecretString,
}

impl SmtpConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let username = username.into();
        Self {
            host: host.into(),
            port,
            from_address: username.clone(),
            username,
            password: SecretString::from(password.into()),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `ALMS_SMTP_USERNAME` - sender account
    /// - `ALMS_SMTP_PASSWORD` - account password
    ///
    /// Optional (with defaults):
    /// - `ALMS_SMTP_HOST` - Default: 127.0.0.1
    /// - `ALMS_SMTP_PORT` - Default: 587
    /// - `ALMS_SMTP_FROM` - Default: the username
    pub fn from_env() -> Result<Self, NotifyError> {
        let host = env::var("ALMS_SMTP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("ALMS_SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .map_err(|e| NotifyError::Config(format!("Invalid ALMS_SMTP_PORT: {}", e)))?;

        let username = env::var("ALMS_SMTP_USERNAME")
            .map_err(|_| NotifyError::MissingEnvVar("ALMS_SMTP_USERNAME".to_string()))?;

        let password = env::var("ALMS_SMTP_PASSWORD")
            .map_err(|_| NotifyError::MissingEnvVar("ALMS_SMTP_PASSWORD".to_string()))?;

        let from_address = env::var("ALMS_SMTP_FROM").unwrap_or_else(|_| username.clone());

        Ok(Self {
            host,
            port,
            username,
            from_address,
            password: SecretString::from(password),
        })
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}
