//! Public contact form intake and the admin inbox behind it.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{ContactId, ContactRequest, ContactStats, ContactStatus, ContactSubmission};
pub use repository::ContactRepository;
pub use router::contact_router;
pub use service::{ContactQuery, ContactService, ContactServiceError, ContactSortField};
pub use validation::{FieldError, ValidContact, MAX_MESSAGE_CHARS, MAX_NAME_CHARS};
