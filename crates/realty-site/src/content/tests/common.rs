use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::auth::TokenAuthority;
use crate::content::domain::{ContentDraft, ContentId, ContentKind, ContentRecord, ContentStatus};
use crate::content::multilingual::MultilingualValue;
use crate::content::repository::ContentRepository;
use crate::content::service::ContentService;
use crate::error::RepositoryError;

#[derive(Default, Clone)]
pub(super) struct MemoryContentRepository {
    pub(super) records: Arc<Mutex<HashMap<ContentId, ContentRecord>>>,
}

impl ContentRepository for MemoryContentRepository {
    fn insert(&self, record: ContentRecord) -> Result<ContentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ContentRecord) -> Result<ContentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ContentId) -> Result<Option<ContentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &ContentId) -> Result<ContentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).ok_or(RepositoryError::NotFound)
    }

    fn increment_views(&self, id: &ContentId) -> Result<ContentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.views += 1;
        Ok(record.clone())
    }

    fn list(&self, kind: ContentKind) -> Result<Vec<ContentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.kind == kind)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableContentRepository;

impl ContentRepository for UnavailableContentRepository {
    fn insert(&self, _record: ContentRecord) -> Result<ContentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ContentRecord) -> Result<ContentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ContentId) -> Result<Option<ContentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &ContentId) -> Result<ContentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn increment_views(&self, _id: &ContentId) -> Result<ContentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _kind: ContentKind) -> Result<Vec<ContentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    ContentService<MemoryContentRepository>,
    Arc<MemoryContentRepository>,
) {
    let repository = Arc::new(MemoryContentRepository::default());
    (ContentService::new(repository.clone()), repository)
}

pub(super) fn authority() -> TokenAuthority {
    TokenAuthority::new("content-tests", 1)
}

pub(super) fn bearer(authority: &TokenAuthority) -> String {
    let issued = authority.issue("admin@example.com").expect("token issued");
    format!("Bearer {}", issued.token)
}

pub(super) fn blog_draft(title: &str, status: ContentStatus) -> ContentDraft {
    ContentDraft {
        title: MultilingualValue::new(title, "", format!("{title} (fr)")),
        excerpt: MultilingualValue::new("Short summary", "", ""),
        content: MultilingualValue::new("<p>Body</p>", "<p>نص</p>", "<p>Corps</p>"),
        category: MultilingualValue::new("Buying", "شراء", "Achat"),
        tags: vec![MultilingualValue::new("villa", "", "villa")],
        featured_image: Some("/uploads/villa.jpg".to_string()),
        status,
        ..ContentDraft::default()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
