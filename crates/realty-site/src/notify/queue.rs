use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{self, Receiver, Sender};

use super::channel::Dispatcher;
use super::error::NotifyError;
use super::notice::{Notice, NoticePlanner};
use crate::contact::ContactRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationJob {
    ContactReceived(ContactRequest),
}

/// Hands jobs to the background worker without waiting on delivery.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, job: NotificationJob) -> Result<(), NotifyError>;
}

/// Bounded hand-off to the worker. Publishing never waits; a full queue is an error.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    sender: Sender<NotificationJob>,
}

impl NotificationQueue {
    pub fn channel(capacity: usize) -> (Self, Receiver<NotificationJob>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl NotificationPublisher for NotificationQueue {
    fn publish(&self, job: NotificationJob) -> Result<(), NotifyError> {
        self.sender.try_send(job).map_err(|err| match err {
            TrySendError::Full(_) => NotifyError::QueueFull,
            TrySendError::Closed(_) => NotifyError::QueueClosed,
        })
    }
}

#[derive(Debug)]
pub struct Delivery {
    pub notice: Notice,
    pub outcome: Result<(), NotifyError>,
}

pub struct NotificationWorker {
    receiver: Receiver<NotificationJob>,
    planner: NoticePlanner,
    dispatcher: Dispatcher,
}

impl NotificationWorker {
    pub fn new(
        receiver: Receiver<NotificationJob>,
        planner: NoticePlanner,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            receiver,
            planner,
            dispatcher,
        }
    }

    /// Drains the queue until every publisher is dropped.
    pub async fn run(mut self) {
        while let Some(job) = self.receiver.recv().await {
            process(&self.planner, &self.dispatcher, job).await;
        }
        tracing::info!("notification queue closed, worker stopping");
    }
}

pub async fn process(
    planner: &NoticePlanner,
    dispatcher: &Dispatcher,
    job: NotificationJob,
) -> Vec<Delivery> {
    let NotificationJob::ContactReceived(request) = job;
    let mut deliveries = Vec::new();

    for notice in planner.plan(&request) {
        let outcome = dispatcher.deliver(&notice).await;
        match &outcome {
            Ok(()) => tracing::info!(
                contact_id = %request.id.0,
                channel = %notice.channel,
                recipient = %notice.recipient,
                "notification delivered"
            ),
            Err(NotifyError::Disabled(_)) => tracing::debug!(
                contact_id = %request.id.0,
                channel = %notice.channel,
                "notification skipped, channel disabled"
            ),
            Err(err) => tracing::warn!(
                contact_id = %request.id.0,
                channel = %notice.channel,
                recipient = %notice.recipient,
                error = %err,
                "notification failed"
            ),
        }
        deliveries.push(Delivery { notice, outcome });
    }

    deliveries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{ContactId, ContactStatus};
    use crate::notify::channel::NoticeChannel;
    use crate::notify::notice::{Audience, ChannelKind};
    use chrono::Utc;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingChannel {
        kind: Option<ChannelKind>,
        sent: Mutex<Vec<Notice>>,
        fail: bool,
    }

    #[axum::async_trait]
    impl NoticeChannel for RecordingChannel {
        fn kind(&self) -> ChannelKind {
            self.kind.unwrap_or(ChannelKind::Email)
        }

        async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(notice.clone());
            if self.fail {
                return Err(NotifyError::Transport {
                    channel: self.kind(),
                    message: "connection refused".to_string(),
                });
            }
            Ok(())
        }
    }

    fn request(phone: Option<&str>) -> ContactRequest {
        let now = Utc::now();
        ContactRequest {
            id: ContactId("contact-000042".to_string()),
            name: "Nadia".to_string(),
            email: "nadia@example.com".to_string(),
            phone: phone.map(str::to_string),
            message: "Is the villa still available?".to_string(),
            agent_id: None,
            subject: None,
            property_type: Some("villa".to_string()),
            budget: None,
            status: ContactStatus::New,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn failing_channel_does_not_stop_the_rest() {
        let email = Arc::new(RecordingChannel {
            kind: Some(ChannelKind::Email),
            fail: true,
            ..RecordingChannel::default()
        });
        let whatsapp = Arc::new(RecordingChannel {
            kind: Some(ChannelKind::WhatsApp),
            ..RecordingChannel::default()
        });
        let dispatcher = Dispatcher::new(Duration::from_secs(1))
            .with_channel(email.clone())
            .with_channel(whatsapp.clone());
        let planner = NoticePlanner::new(
            Some("admin@example.com".to_string()),
            Some("+212600000000".to_string()),
            "Atlas Homes",
        );

        let deliveries = process(
            &planner,
            &dispatcher,
            NotificationJob::ContactReceived(request(Some("+212611111111"))),
        )
        .await;

        assert_eq!(deliveries.len(), 4);
        assert_eq!(email.sent.lock().unwrap().len(), 2);
        assert_eq!(whatsapp.sent.lock().unwrap().len(), 2);
        assert!(deliveries
            .iter()
            .filter(|d| d.notice.channel == ChannelKind::Email)
            .all(|d| d.outcome.is_err()));
        assert!(deliveries
            .iter()
            .filter(|d| d.notice.channel == ChannelKind::WhatsApp)
            .all(|d| d.outcome.is_ok()));
    }

    #[tokio::test]
    async fn no_submitter_whatsapp_is_attempted_without_phone() {
        let whatsapp = Arc::new(RecordingChannel {
            kind: Some(ChannelKind::WhatsApp),
            ..RecordingChannel::default()
        });
        let dispatcher = Dispatcher::new(Duration::from_secs(1)).with_channel(whatsapp.clone());
        let planner = NoticePlanner::new(None, Some("+212600000000".to_string()), "Atlas Homes");

        let deliveries = process(
            &planner,
            &dispatcher,
            NotificationJob::ContactReceived(request(None)),
        )
        .await;

        let sent = whatsapp.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].audience, Audience::Admin);
        // Submitter email is planned but the channel is off.
        assert!(deliveries
            .iter()
            .any(|d| matches!(d.outcome, Err(NotifyError::Disabled(ChannelKind::Email)))));
    }

    #[tokio::test]
    async fn worker_stops_when_queue_is_dropped() {
        let (queue, receiver) = NotificationQueue::channel(4);
        let whatsapp = Arc::new(RecordingChannel {
            kind: Some(ChannelKind::WhatsApp),
            ..RecordingChannel::default()
        });
        let worker = NotificationWorker::new(
            receiver,
            NoticePlanner::new(None, None, "Atlas Homes"),
            Dispatcher::new(Duration::from_secs(1)).with_channel(whatsapp.clone()),
        );
        let handle = tokio::spawn(worker.run());

        queue
            .publish(NotificationJob::ContactReceived(request(Some("+212611111111"))))
            .expect("queued");
        drop(queue);
        handle.await.expect("worker exits cleanly");

        assert_eq!(whatsapp.sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn publishing_to_a_closed_queue_fails() {
        let (queue, receiver) = NotificationQueue::channel(4);
        drop(receiver);
        assert!(matches!(
            queue.publish(NotificationJob::ContactReceived(request(None))),
            Err(NotifyError::QueueClosed)
        ));
    }

    #[test]
    fn publishing_past_capacity_is_rejected_without_blocking() {
        let (queue, mut receiver) = NotificationQueue::channel(2);
        for _ in 0..2 {
            queue
                .publish(NotificationJob::ContactReceived(request(None)))
                .expect("queued");
        }
        assert!(matches!(
            queue.publish(NotificationJob::ContactReceived(request(None))),
            Err(NotifyError::QueueFull)
        ));

        assert!(receiver.try_recv().is_ok());
        queue
            .publish(NotificationJob::ContactReceived(request(None)))
            .expect("room after the worker drains one");
    }
}
