use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use tracing::{debug, info};

use crate::{Notifier, NotifyError, SmtpConfig};

const THANK_YOU_SUBJECT: &str = "Thank You for Your Donations!";
const THANK_YOU_BODY: &str = "We appreciate your generosity!";

/// Sends the thank-you mail over SMTP with a pooled STARTTLS connection.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotifier {
    pub fn new(config: SmtpConfig) -> Result<Self, NotifyError> {
        let creds = Credentials::new(config.username.clone(), config.password().to_string());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(creds)
            .build();

        info!(
            host = %config.host,
            port = config.port,
            from = %config.from_address,
            "Created SMTP notifier"
        );

        Ok(Self {
            transport,
            from_address: config.from_address,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_thank_you(&self, recipient: &str) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotifyError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(recipient
                .parse()
                .map_err(|_| NotifyError::InvalidAddress(recipient.to_string()))?)
            .subject(THANK_YOU_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(THANK_YOU_BODY.to_string())
            .map_err(|e| NotifyError::Send(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Send(e.to_string()))?;

        info!(to = %recipient, "Thank-you notification sent");
        Ok(())
    }
}

/// Stand-in when SMTP is not configured; records the intent in the log and
/// succeeds.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send_thank_you(&self, recipient: &str) -> Result<(), NotifyError> {
        debug!(to = %recipient, "SMTP not configured, skipping thank-you notification");
        Ok(())
    }
}
