//! Property listings shown on the public site and described to search engines.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{ListingType, Property, PropertyDraft, PropertyId, PropertyStatus};
pub use repository::PropertyRepository;
pub use router::property_router;
pub use service::{PropertyQuery, PropertyService, PropertyServiceError};
