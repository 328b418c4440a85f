use std::time::Duration;

use super::notice::ChannelKind;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("{0} channel is not configured")]
    Disabled(ChannelKind),
    #[error("{channel} delivery timed out after {}ms", .after.as_millis())]
    Timeout { channel: ChannelKind, after: Duration },
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("{channel} transport failed: {message}")]
    Transport {
        channel: ChannelKind,
        message: String,
    },
    #[error("{channel} provider rejected the message ({status}): {body}")]
    Rejected {
        channel: ChannelKind,
        status: u16,
        body: String,
    },
    #[error("notification queue is closed")]
    QueueClosed,
    #[error("notification queue is full")]
    QueueFull,
}
