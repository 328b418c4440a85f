use super::domain::{Property, PropertyId};
use crate::error::RepositoryError;

pub trait PropertyRepository: Send + Sync {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError>;
    fn update(&self, property: Property) -> Result<Property, RepositoryError>;
    fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError>;
    fn delete(&self, id: &PropertyId) -> Result<Property, RepositoryError>;
    fn all(&self) -> Result<Vec<Property>, RepositoryError>;
}
