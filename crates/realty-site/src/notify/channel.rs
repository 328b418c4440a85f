use std::sync::Arc;
use std::time::Duration;

use super::email::SmtpEmailChannel;
use super::error::NotifyError;
use super::notice::{ChannelKind, Notice};
use super::whatsapp::TwilioWhatsAppChannel;
use crate::config::NotificationConfig;

/// A delivery mechanism for one [`ChannelKind`].
#[axum::async_trait]
pub trait NoticeChannel: Send + Sync {
    fn kind(&self) -> ChannelKind;

    async fn send(&self, notice: &Notice) -> Result<(), NotifyError>;
}

/// Routes notices to the configured channels, one attempt each, bounded by a
/// per-call timeout.
#[derive(Clone)]
pub struct Dispatcher {
    email: Option<Arc<dyn NoticeChannel>>,
    whatsapp: Option<Arc<dyn NoticeChannel>>,
    timeout: Duration,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("email", &self.email.is_some())
            .field("whatsapp", &self.whatsapp.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Dispatcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            email: None,
            whatsapp: None,
            timeout,
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Result<Self, NotifyError> {
        let mut dispatcher = Self::new(config.outbound_timeout);
        match &config.smtp {
            Some(smtp) => {
                let channel = SmtpEmailChannel::new(smtp)?;
                dispatcher = dispatcher.with_channel(Arc::new(channel));
            }
            None => tracing::warn!("SMTP settings missing; email notifications disabled"),
        }
        match &config.twilio {
            Some(twilio) => {
                let channel = TwilioWhatsAppChannel::new(twilio.clone());
                dispatcher = dispatcher.with_channel(Arc::new(channel));
            }
            None => tracing::warn!("Twilio settings missing; WhatsApp notifications disabled"),
        }
        Ok(dispatcher)
    }

    pub fn with_channel(mut self, channel: Arc<dyn NoticeChannel>) -> Self {
        match channel.kind() {
            ChannelKind::Email => self.email = Some(channel),
            ChannelKind::WhatsApp => self.whatsapp = Some(channel),
        }
        self
    }

    pub fn is_enabled(&self, kind: ChannelKind) -> bool {
        match kind {
            ChannelKind::Email => self.email.is_some(),
            ChannelKind::WhatsApp => self.whatsapp.is_some(),
        }
    }

    pub async fn deliver(&self, notice: &Notice) -> Result<(), NotifyError> {
        let channel = match notice.channel {
            ChannelKind::Email => self.email.as_ref(),
            ChannelKind::WhatsApp => self.whatsapp.as_ref(),
        }
        .ok_or(NotifyError::Disabled(notice.channel))?;

        match tokio::time::timeout(self.timeout, channel.send(notice)).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::Timeout {
                channel: notice.channel,
                after: self.timeout,
            }),
        }
    }
}
