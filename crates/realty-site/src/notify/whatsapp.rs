use super::channel::NoticeChannel;
use super::error::NotifyError;
use super::notice::{ChannelKind, Notice};
use crate::config::TwilioConfig;

const WHATSAPP_PREFIX: &str = "whatsapp:";

/// Sends WhatsApp messages through the Twilio Messages API.
pub struct TwilioWhatsAppChannel {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioWhatsAppChannel {
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[axum::async_trait]
impl NoticeChannel for TwilioWhatsAppChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::WhatsApp
    }

    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        let from = whatsapp_address(&self.config.whatsapp_from);
        let to = whatsapp_address(&notice.recipient);

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("From", from.as_str()),
                ("To", to.as_str()),
                ("Body", notice.body.as_str()),
            ])
            .send()
            .await
            .map_err(|err| NotifyError::Transport {
                channel: ChannelKind::WhatsApp,
                message: err.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                channel: ChannelKind::WhatsApp,
                status,
                body,
            });
        }
        Ok(())
    }
}

fn whatsapp_address(number: &str) -> String {
    let number = number.trim();
    if number.starts_with(WHATSAPP_PREFIX) {
        number.to_string()
    } else {
        let digits: String = number
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        format!("{WHATSAPP_PREFIX}{digits}")
    }
}
