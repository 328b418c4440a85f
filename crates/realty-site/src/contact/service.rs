use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{ContactId, ContactRequest, ContactStats, ContactStatus, ContactSubmission};
use super::repository::ContactRepository;
use super::validation::validate_submission;
use crate::error::{ApiError, RepositoryError};
use crate::notify::{NotificationJob, NotificationPublisher, NotifyError};
use crate::pagination::{PageRequest, Paginated, SortOrder};

static CONTACT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_contact_id() -> ContactId {
    let id = CONTACT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ContactId(format!("contact-{id:06}"))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContactSortField {
    Name,
    Email,
    Status,
    Subject,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl ContactSortField {
    /// Unknown or missing fields sort by creation time.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("name") => Self::Name,
            Some("email") => Self::Email,
            Some("status") => Self::Status,
            Some("subject") => Self::Subject,
            Some("updatedAt") => Self::UpdatedAt,
            _ => Self::CreatedAt,
        }
    }

    fn compare(self, a: &ContactRequest, b: &ContactRequest) -> CmpOrdering {
        match self {
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::Email => a.email.cmp(&b.email),
            Self::Status => a.status.label().cmp(b.status.label()),
            Self::Subject => a.subject.cmp(&b.subject),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContactQuery {
    pub status: Option<ContactStatus>,
    pub sort_by: ContactSortField,
    pub order: SortOrder,
}

pub struct ContactService<R> {
    repository: Arc<R>,
    publisher: Arc<dyn NotificationPublisher>,
}

impl<R> Clone for ContactService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            publisher: Arc::clone(&self.publisher),
        }
    }
}

impl<R> ContactService<R>
where
    R: ContactRepository + 'static,
{
    pub fn new(repository: Arc<R>, publisher: Arc<dyn NotificationPublisher>) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// Stores the request, then queues its notifications. Queueing problems
    /// are logged; the stored request is returned regardless.
    pub fn submit(
        &self,
        submission: ContactSubmission,
    ) -> Result<ContactRequest, ContactServiceError> {
        let valid = validate_submission(submission).map_err(|err| {
            ContactServiceError::Validation {
                field: err.field,
                message: err.message,
            }
        })?;

        let now = Utc::now();
        let request = ContactRequest {
            id: next_contact_id(),
            name: valid.name,
            email: valid.email,
            phone: valid.phone,
            message: valid.message,
            agent_id: valid.agent_id,
            subject: valid.subject,
            property_type: valid.property_type,
            budget: valid.budget,
            status: ContactStatus::New,
            created_at: now,
            updated_at: now,
        };
        let stored = self.repository.insert(request)?;
        tracing::info!(contact_id = %stored.id.0, "contact request received");

        match self
            .publisher
            .publish(NotificationJob::ContactReceived(stored.clone()))
        {
            Ok(()) => {}
            Err(NotifyError::QueueFull) => tracing::warn!(
                contact_id = %stored.id.0,
                "notification queue full, notifications dropped"
            ),
            Err(err) => {
                tracing::error!(contact_id = %stored.id.0, error = %err, "failed to queue notifications")
            }
        }

        Ok(stored)
    }

    pub fn list(
        &self,
        query: ContactQuery,
        page: PageRequest,
    ) -> Result<Paginated<ContactRequest>, ContactServiceError> {
        let mut requests: Vec<ContactRequest> = self
            .repository
            .all()?
            .into_iter()
            .filter(|request| query.status.map_or(true, |status| request.status == status))
            .collect();
        requests.sort_by(|a, b| {
            query
                .order
                .apply(query.sort_by.compare(a, b))
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.sequence().cmp(&b.id.sequence()))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(page.apply(requests))
    }

    pub fn get(&self, id: &ContactId) -> Result<ContactRequest, ContactServiceError> {
        self.repository
            .fetch(id)?
            .ok_or(ContactServiceError::NotFound)
    }

    pub fn update_status(
        &self,
        id: &ContactId,
        status: ContactStatus,
    ) -> Result<ContactRequest, ContactServiceError> {
        let mut request = self.get(id)?;
        request.status = status;
        request.updated_at = Utc::now();
        let updated = self.repository.update(request).map_err(not_found)?;
        tracing::info!(contact_id = %updated.id.0, status = status.label(), "contact request updated");
        Ok(updated)
    }

    pub fn delete(&self, id: &ContactId) -> Result<ContactRequest, ContactServiceError> {
        let removed = self.repository.delete(id).map_err(not_found)?;
        tracing::info!(contact_id = %removed.id.0, "contact request deleted");
        Ok(removed)
    }

    pub fn stats(&self) -> Result<ContactStats, ContactServiceError> {
        let mut stats = ContactStats::default();
        for request in self.repository.all()? {
            stats.record(request.status);
        }
        Ok(stats)
    }
}

fn not_found(err: RepositoryError) -> ContactServiceError {
    match err {
        RepositoryError::NotFound => ContactServiceError::NotFound,
        other => other.into(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContactServiceError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("contact request not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ContactServiceError> for ApiError {
    fn from(value: ContactServiceError) -> Self {
        match value {
            ContactServiceError::Validation { field, message } => ApiError::field(field, message),
            ContactServiceError::NotFound => {
                ApiError::NotFound("contact request not found".to_string())
            }
            ContactServiceError::Repository(err) => err.into(),
        }
    }
}
