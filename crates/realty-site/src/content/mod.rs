//! Multilingual content: blog posts, service entries, process steps, and FAQ
//! entries, plus the `{en, ar, fr}` value type every editable field uses.

pub mod domain;
pub mod multilingual;
pub mod repository;
pub mod router;
pub mod service;
mod slug;

#[cfg(test)]
mod tests;

pub use domain::{ContentDraft, ContentId, ContentKind, ContentRecord, ContentStatus, SeoFields};
pub use multilingual::{ensure_multilingual, Locale, MultilingualValue, UnknownLocale};
pub use repository::ContentRepository;
pub use router::content_router;
pub use service::{ContentQuery, ContentService, ContentServiceError};
pub use slug::slugify;
