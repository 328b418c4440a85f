use super::domain::{ContentId, ContentKind, ContentRecord};
use crate::error::RepositoryError;

/// Storage abstraction for content documents so services can be exercised in isolation.
pub trait ContentRepository: Send + Sync {
    fn insert(&self, record: ContentRecord) -> Result<ContentRecord, RepositoryError>;
    fn update(&self, record: ContentRecord) -> Result<ContentRecord, RepositoryError>;
    fn fetch(&self, id: &ContentId) -> Result<Option<ContentRecord>, RepositoryError>;
    fn delete(&self, id: &ContentId) -> Result<ContentRecord, RepositoryError>;
    /// Bumps the view counter in place and returns the stored record.
    fn increment_views(&self, id: &ContentId) -> Result<ContentRecord, RepositoryError>;
    /// Every record of `kind`, in no particular order.
    fn list(&self, kind: ContentKind) -> Result<Vec<ContentRecord>, RepositoryError>;
}
