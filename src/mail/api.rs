use super::message::Notification;
use crate::config::model::MailConfig;
use crate::ticketmaster::model::EventRecord;
use crate::watcher::Notifier;
use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, instrument};

pub struct MailAPI {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
    skip_sending: bool,
}

impl MailAPI {
    /// Builds the STARTTLS transport. No connection is opened until the first send.
    pub fn new(config: &MailConfig, skip_sending: bool) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
            .map_err(NotifyError::Transport)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.expose().to_string(),
            ))
            .build();

        Ok(Self {
            transport,
            sender: parse_mailbox(&config.sender)?,
            recipient: parse_mailbox(&config.recipient)?,
            skip_sending,
        })
    }

    pub fn build_message(&self, notification: Notification) -> Result<Message, NotifyError> {
        Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(notification.subject)
            .multipart(MultiPart::mixed().singlepart(SinglePart::plain(notification.body)))
            .map_err(NotifyError::Build)
    }

    #[instrument(skip(self, event), fields(event = %event.name, event.id = %event.id))]
    pub async fn send_event(&self, event: &EventRecord) -> Result<(), NotifyError> {
        let notification = Notification::for_event(event);

        if self.skip_sending {
            info!("Skipping send, would have sent:\n{}", notification.body);
            return Ok(());
        }

        let message = self.build_message(notification)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(NotifyError::Transport)?;

        debug!("SMTP server answered {:?}", response.code());
        info!("Email sent for {}", event.name);

        Ok(())
    }
}

#[async_trait]
impl Notifier for MailAPI {
    async fn notify(&self, event: &EventRecord) -> Result<(), NotifyError> {
        self.send_event(event).await
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|source| NotifyError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("'{address}' is not a valid mailbox: {source}")]
    InvalidAddress {
        address: String,
        source: AddressError,
    },
    #[error("couldn't build message: {0}")]
    Build(#[source] lettre::error::Error),
    #[error("failed to send email: {0}")]
    Transport(#[source] lettre::transport::smtp::Error),
    /// For [`Notifier`] implementations that deliver through something other than SMTP
    #[error("failed to deliver: {0}")]
    Other(String),
}
