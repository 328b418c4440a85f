use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::auth::TokenAuthority;
use crate::contact::domain::{ContactId, ContactRequest, ContactSubmission};
use crate::contact::repository::ContactRepository;
use crate::contact::service::ContactService;
use crate::error::RepositoryError;
use crate::notify::{NotificationJob, NotificationPublisher, NotifyError};

#[derive(Default, Clone)]
pub(super) struct MemoryContactRepository {
    pub(super) records: Arc<Mutex<HashMap<ContactId, ContactRequest>>>,
}

impl ContactRepository for MemoryContactRepository {
    fn insert(&self, request: ContactRequest) -> Result<ContactRequest, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&request.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    fn update(&self, request: ContactRequest) -> Result<ContactRequest, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&request.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    fn fetch(&self, id: &ContactId) -> Result<Option<ContactRequest>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &ContactId) -> Result<ContactRequest, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).ok_or(RepositoryError::NotFound)
    }

    fn all(&self) -> Result<Vec<ContactRequest>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableContactRepository;

impl ContactRepository for UnavailableContactRepository {
    fn insert(&self, _request: ContactRequest) -> Result<ContactRequest, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _request: ContactRequest) -> Result<ContactRequest, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ContactId) -> Result<Option<ContactRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &ContactId) -> Result<ContactRequest, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<ContactRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingPublisher {
    pub(super) jobs: Mutex<Vec<NotificationJob>>,
    pub(super) closed: bool,
}

impl NotificationPublisher for RecordingPublisher {
    fn publish(&self, job: NotificationJob) -> Result<(), NotifyError> {
        if self.closed {
            return Err(NotifyError::QueueClosed);
        }
        self.jobs.lock().expect("publisher mutex poisoned").push(job);
        Ok(())
    }
}

pub(super) fn build_service() -> (
    ContactService<MemoryContactRepository>,
    Arc<MemoryContactRepository>,
    Arc<RecordingPublisher>,
) {
    let repository = Arc::new(MemoryContactRepository::default());
    let publisher = Arc::new(RecordingPublisher::default());
    (
        ContactService::new(repository.clone(), publisher.clone()),
        repository,
        publisher,
    )
}

pub(super) fn authority() -> TokenAuthority {
    TokenAuthority::new("contact-tests", 1)
}

pub(super) fn bearer(authority: &TokenAuthority) -> String {
    let issued = authority.issue("admin@example.com").expect("token issued");
    format!("Bearer {}", issued.token)
}

pub(super) fn submission(name: &str, email: &str, message: &str) -> ContactSubmission {
    ContactSubmission {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        message: Some(message.to_string()),
        ..ContactSubmission::default()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
