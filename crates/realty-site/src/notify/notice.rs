use std::fmt;

use serde::Serialize;

use crate::config::NotificationConfig;
use crate::contact::ContactRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    WhatsApp,
}

impl ChannelKind {
    pub const fn label(self) -> &'static str {
        match self {
            ChannelKind::Email => "email",
            ChannelKind::WhatsApp => "whatsapp",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Admin,
    Submitter,
}

/// One outbound message on one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub channel: ChannelKind,
    pub audience: Audience,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Decides who hears about a contact request and what they are told.
#[derive(Debug, Clone, Default)]
pub struct NoticePlanner {
    admin_email: Option<String>,
    admin_whatsapp: Option<String>,
    site_name: String,
}

impl NoticePlanner {
    pub fn new(
        admin_email: Option<String>,
        admin_whatsapp: Option<String>,
        site_name: impl Into<String>,
    ) -> Self {
        Self {
            admin_email,
            admin_whatsapp,
            site_name: site_name.into(),
        }
    }

    pub fn from_config(config: &NotificationConfig, site_name: &str) -> Self {
        Self::new(
            config.admin_email.clone(),
            config.admin_whatsapp.clone(),
            site_name,
        )
    }

    pub fn plan(&self, request: &ContactRequest) -> Vec<Notice> {
        let mut notices = Vec::with_capacity(4);

        if let Some(admin) = &self.admin_email {
            notices.push(Notice {
                channel: ChannelKind::Email,
                audience: Audience::Admin,
                recipient: admin.clone(),
                subject: format!("New contact request from {}", request.name),
                body: admin_summary(request),
            });
        }

        notices.push(Notice {
            channel: ChannelKind::Email,
            audience: Audience::Submitter,
            recipient: request.email.clone(),
            subject: format!("We received your message | {}", self.site_name),
            body: format!(
                "Hello {},\n\nThank you for contacting {}. An agent will get back to you shortly.\n\nYour message:\n{}\n",
                request.name, self.site_name, request.message
            ),
        });

        if let Some(admin) = &self.admin_whatsapp {
            notices.push(Notice {
                channel: ChannelKind::WhatsApp,
                audience: Audience::Admin,
                recipient: admin.clone(),
                subject: String::new(),
                body: format!(
                    "New contact request from {} ({}): {}",
                    request.name,
                    request.phone.as_deref().unwrap_or(&request.email),
                    excerpt(&request.message, 280)
                ),
            });
        }

        if let Some(phone) = &request.phone {
            notices.push(Notice {
                channel: ChannelKind::WhatsApp,
                audience: Audience::Submitter,
                recipient: phone.clone(),
                subject: String::new(),
                body: format!(
                    "Hello {}, thank you for contacting {}. We will reply soon.",
                    request.name, self.site_name
                ),
            });
        }

        notices
    }
}

fn admin_summary(request: &ContactRequest) -> String {
    let mut lines = vec![
        format!("Name: {}", request.name),
        format!("Email: {}", request.email),
    ];
    let optional = [
        ("Phone", &request.phone),
        ("Subject", &request.subject),
        ("Property type", &request.property_type),
        ("Budget", &request.budget),
        ("Agent", &request.agent_id),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            lines.push(format!("{label}: {value}"));
        }
    }
    lines.push(String::new());
    lines.push(request.message.clone());
    lines.join("\n")
}

fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push('…');
    cut
}
