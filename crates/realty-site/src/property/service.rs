use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{ListingType, Property, PropertyDraft, PropertyId};
use super::repository::PropertyRepository;
use crate::error::{ApiError, RepositoryError};
use crate::pagination::{PageRequest, Paginated};

static PROPERTY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_property_id() -> PropertyId {
    let id = PROPERTY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PropertyId(format!("prop-{id:06}"))
}

const DEFAULT_CURRENCY: &str = "MAD";

#[derive(Debug, Clone, Default)]
pub struct PropertyQuery {
    pub listing: Option<ListingType>,
    pub property_type: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub featured: Option<bool>,
}

impl PropertyQuery {
    fn matches(&self, property: &Property) -> bool {
        self.listing.map_or(true, |listing| property.listing == listing)
            && self
                .property_type
                .as_deref()
                .map_or(true, |kind| property.property_type.eq_ignore_ascii_case(kind))
            && self.min_price.map_or(true, |min| property.price >= min)
            && self.max_price.map_or(true, |max| property.price <= max)
            && self.featured.map_or(true, |featured| property.featured == featured)
    }
}

pub struct PropertyService<R> {
    repository: Arc<R>,
}

impl<R> Clone for PropertyService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> PropertyService<R>
where
    R: PropertyRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn create(&self, draft: PropertyDraft) -> Result<Property, PropertyServiceError> {
        validate(&draft)?;
        let now = Utc::now();
        let property = build(next_property_id(), draft, now, now);
        let stored = self.repository.insert(property)?;
        tracing::info!(id = %stored.id.0, "property listed");
        Ok(stored)
    }

    pub fn update(
        &self,
        id: &PropertyId,
        draft: PropertyDraft,
    ) -> Result<Property, PropertyServiceError> {
        validate(&draft)?;
        let existing = self.get(id)?;
        let property = build(existing.id, draft, existing.created_at, Utc::now());
        Ok(self.repository.update(property)?)
    }

    pub fn get(&self, id: &PropertyId) -> Result<Property, PropertyServiceError> {
        self.repository
            .fetch(id)?
            .ok_or(PropertyServiceError::NotFound)
    }

    pub fn delete(&self, id: &PropertyId) -> Result<Property, PropertyServiceError> {
        self.repository.delete(id).map_err(|err| match err {
            RepositoryError::NotFound => PropertyServiceError::NotFound,
            other => other.into(),
        })
    }

    /// Featured listings first, then newest.
    pub fn list(
        &self,
        query: &PropertyQuery,
        page: PageRequest,
    ) -> Result<Paginated<Property>, PropertyServiceError> {
        let mut properties: Vec<Property> = self
            .repository
            .all()?
            .into_iter()
            .filter(|property| query.matches(property))
            .collect();
        properties.sort_by(|a, b| {
            b.featured
                .cmp(&a.featured)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(page.apply(properties))
    }
}

fn validate(draft: &PropertyDraft) -> Result<(), PropertyServiceError> {
    if draft.title.en.trim().is_empty() {
        return Err(PropertyServiceError::Validation {
            field: "title",
            message: "English title is required".to_string(),
        });
    }
    if draft.price == 0 {
        return Err(PropertyServiceError::Validation {
            field: "price",
            message: "price must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn build(
    id: PropertyId,
    draft: PropertyDraft,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
) -> Property {
    Property {
        id,
        title: draft.title,
        description: draft.description,
        location: draft.location,
        price: draft.price,
        currency: draft
            .currency
            .filter(|currency| !currency.trim().is_empty())
            .map(|currency| currency.trim().to_ascii_uppercase())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        listing: draft.listing,
        property_type: draft.property_type,
        bedrooms: draft.bedrooms,
        bathrooms: draft.bathrooms,
        area_sqm: draft.area_sqm,
        images: draft.images,
        status: draft.status,
        featured: draft.featured,
        seo: draft.seo,
        created_at,
        updated_at,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PropertyServiceError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("property not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<PropertyServiceError> for ApiError {
    fn from(value: PropertyServiceError) -> Self {
        match value {
            PropertyServiceError::Validation { field, message } => ApiError::field(field, message),
            PropertyServiceError::NotFound => ApiError::NotFound("property not found".to_string()),
            PropertyServiceError::Repository(err) => err.into(),
        }
    }
}
