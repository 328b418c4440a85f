use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::channel::NoticeChannel;
use super::error::NotifyError;
use super::notice::{ChannelKind, Notice};
use crate::config::SmtpConfig;

const IMPLICIT_TLS_PORT: u16 = 465;

pub struct SmtpEmailChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailChannel {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let from = parse_mailbox(&config.from)?;
        let builder = if config.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|err| transport_error(err.to_string()))?
        .port(config.port);

        let builder = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.clone(), pass.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn compose(&self, notice: &Notice) -> Result<Message, NotifyError> {
        Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&notice.recipient)?)
            .subject(notice.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(notice.body.clone())
            .map_err(|err| transport_error(err.to_string()))
    }
}

#[axum::async_trait]
impl NoticeChannel for SmtpEmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        let message = self.compose(notice)?;
        self.transport
            .send(message)
            .await
            .map_err(|err| transport_error(err.to_string()))?;
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse::<Mailbox>()
        .map_err(|err| NotifyError::InvalidAddress {
            address: address.to_string(),
            reason: err.to_string(),
        })
}

fn transport_error(message: String) -> NotifyError {
    NotifyError::Transport {
        channel: ChannelKind::Email,
        message,
    }
}
