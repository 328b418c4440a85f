use super::domain::{ContactId, ContactRequest};
use crate::error::RepositoryError;

pub trait ContactRepository: Send + Sync {
    fn insert(&self, request: ContactRequest) -> Result<ContactRequest, RepositoryError>;
    fn update(&self, request: ContactRequest) -> Result<ContactRequest, RepositoryError>;
    fn fetch(&self, id: &ContactId) -> Result<Option<ContactRequest>, RepositoryError>;
    fn delete(&self, id: &ContactId) -> Result<ContactRequest, RepositoryError>;
    fn all(&self) -> Result<Vec<ContactRequest>, RepositoryError>;
}
