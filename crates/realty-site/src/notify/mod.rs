//! Outbound notifications for contact requests.
//!
//! Requests are stored first, then a [`NotificationJob`] is queued. A single
//! [`NotificationWorker`] plans the notices and delivers them over email
//! (SMTP) and WhatsApp (Twilio). Failures are logged and never reach the
//! HTTP caller.

mod channel;
mod email;
mod error;
mod notice;
mod queue;
mod whatsapp;

pub use channel::{Dispatcher, NoticeChannel};
pub use email::SmtpEmailChannel;
pub use error::NotifyError;
pub use notice::{Audience, ChannelKind, Notice, NoticePlanner};
pub use queue::{
    process, Delivery, NotificationJob, NotificationPublisher, NotificationQueue,
    NotificationWorker,
};
pub use whatsapp::TwilioWhatsAppChannel;
