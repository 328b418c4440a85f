use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{ContentDraft, ContentId, ContentKind, ContentRecord, ContentStatus};
use super::multilingual::{Locale, MultilingualValue};
use super::repository::ContentRepository;
use super::slug::slugify;
use crate::error::{ApiError, RepositoryError};
use crate::pagination::{PageRequest, Paginated};

static CONTENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_content_id(kind: ContentKind) -> ContentId {
    let id = CONTENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ContentId(format!("{}-{id:06}", kind.id_prefix()))
}

/// Listing filters. Unpublished records are only visible to admins.
#[derive(Debug, Clone, Default)]
pub struct ContentQuery {
    pub status: Option<ContentStatus>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub include_unpublished: bool,
}

/// CRUD over content records of every kind, enforcing slug and title rules.
pub struct ContentService<R> {
    repository: Arc<R>,
}

impl<R> Clone for ContentService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> ContentService<R>
where
    R: ContentRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn create(
        &self,
        kind: ContentKind,
        draft: ContentDraft,
    ) -> Result<ContentRecord, ContentServiceError> {
        validate_draft(&draft)?;
        let id = next_content_id(kind);
        let slug = self.assign_slugs(kind, &id, &draft)?;
        let now = Utc::now();

        let record = ContentRecord {
            id,
            kind,
            slug,
            published_at: (draft.status == ContentStatus::Published).then_some(now),
            title: draft.title,
            excerpt: draft.excerpt,
            content: draft.content,
            category: draft.category,
            tags: draft.tags,
            featured_image: draft.featured_image,
            gallery: draft.gallery,
            status: draft.status,
            featured: draft.featured,
            order: draft.order,
            author: draft.author,
            seo: draft.seo,
            views: 0,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        tracing::info!(id = %stored.id.0, kind = kind.label(), "content created");
        Ok(stored)
    }

    pub fn update(
        &self,
        kind: ContentKind,
        id: &ContentId,
        draft: ContentDraft,
    ) -> Result<ContentRecord, ContentServiceError> {
        validate_draft(&draft)?;
        let existing = self.get(kind, id)?;
        let slug = self.assign_slugs(kind, id, &draft)?;
        let now = Utc::now();

        let published_at = match (existing.published_at, draft.status) {
            (Some(at), _) => Some(at),
            (None, ContentStatus::Published) => Some(now),
            (None, _) => None,
        };

        let record = ContentRecord {
            id: existing.id,
            kind,
            slug,
            title: draft.title,
            excerpt: draft.excerpt,
            content: draft.content,
            category: draft.category,
            tags: draft.tags,
            featured_image: draft.featured_image,
            gallery: draft.gallery,
            status: draft.status,
            featured: draft.featured,
            order: draft.order,
            author: draft.author,
            seo: draft.seo,
            views: existing.views,
            published_at,
            created_at: existing.created_at,
            updated_at: now,
        };

        Ok(self.repository.update(record)?)
    }

    /// Fetch a record of the given kind regardless of status.
    pub fn get(
        &self,
        kind: ContentKind,
        id: &ContentId,
    ) -> Result<ContentRecord, ContentServiceError> {
        self.repository
            .fetch(id)?
            .filter(|record| record.kind == kind)
            .ok_or(ContentServiceError::NotFound(kind))
    }

    /// Fetch a published record by slug without counting a view.
    pub fn find_published(
        &self,
        kind: ContentKind,
        slug: &str,
        locale: Option<Locale>,
    ) -> Result<ContentRecord, ContentServiceError> {
        self.repository
            .list(kind)?
            .into_iter()
            .find(|record| record.is_published() && record.has_slug(slug, locale))
            .ok_or(ContentServiceError::NotFound(kind))
    }

    /// Public read by slug; counts a view.
    pub fn read_by_slug(
        &self,
        kind: ContentKind,
        slug: &str,
        locale: Option<Locale>,
    ) -> Result<ContentRecord, ContentServiceError> {
        let record = self.find_published(kind, slug, locale)?;
        self.repository
            .increment_views(&record.id)
            .map_err(|err| match err {
                RepositoryError::NotFound => ContentServiceError::NotFound(kind),
                other => other.into(),
            })
    }

    pub fn list(
        &self,
        kind: ContentKind,
        query: &ContentQuery,
        page: PageRequest,
    ) -> Result<Paginated<ContentRecord>, ContentServiceError> {
        let mut records: Vec<ContentRecord> = self
            .repository
            .list(kind)?
            .into_iter()
            .filter(|record| {
                if query.include_unpublished {
                    query.status.map_or(true, |status| record.status == status)
                } else {
                    record.is_published()
                }
            })
            .filter(|record| {
                query
                    .category
                    .as_deref()
                    .map_or(true, |category| record.category.matches(category))
            })
            .filter(|record| query.featured.map_or(true, |featured| record.featured == featured))
            .collect();

        records.sort_by(|a, b| {
            a.order.cmp(&b.order).then_with(|| {
                let a_at = a.published_at.unwrap_or(a.created_at);
                let b_at = b.published_at.unwrap_or(b.created_at);
                b_at.cmp(&a_at)
            })
        });

        Ok(page.apply(records))
    }

    pub fn delete(
        &self,
        kind: ContentKind,
        id: &ContentId,
    ) -> Result<ContentRecord, ContentServiceError> {
        self.get(kind, id)?;
        let removed = self.repository.delete(id)?;
        tracing::info!(id = %removed.id.0, kind = kind.label(), "content deleted");
        Ok(removed)
    }

    fn assign_slugs(
        &self,
        kind: ContentKind,
        id: &ContentId,
        draft: &ContentDraft,
    ) -> Result<MultilingualValue, ContentServiceError> {
        let mut slug = MultilingualValue::default();
        for locale in Locale::ALL {
            let requested = slugify(draft.slug.get(locale));
            let value = if requested.is_empty() {
                slugify(draft.title.get(locale))
            } else {
                requested
            };
            slug.set(locale, value);
        }

        let siblings = self.repository.list(kind)?;
        for locale in Locale::ALL {
            let candidate = slug.get(locale);
            if candidate.is_empty() {
                continue;
            }
            let clash = siblings
                .iter()
                .any(|other| &other.id != id && other.slug.get(locale) == candidate);
            if clash {
                return Err(ContentServiceError::SlugTaken {
                    locale,
                    slug: candidate.to_string(),
                });
            }
        }

        Ok(slug)
    }
}

fn validate_draft(draft: &ContentDraft) -> Result<(), ContentServiceError> {
    if draft.title.en.trim().is_empty() {
        return Err(ContentServiceError::Validation {
            field: "title",
            message: "English title is required".to_string(),
        });
    }
    Ok(())
}

/// Error raised by the content service.
#[derive(Debug, thiserror::Error)]
pub enum ContentServiceError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("{} not found", .0.label())]
    NotFound(ContentKind),
    #[error("slug '{slug}' is already used for locale {locale}")]
    SlugTaken { locale: Locale, slug: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ContentServiceError> for ApiError {
    fn from(value: ContentServiceError) -> Self {
        match value {
            ContentServiceError::Validation { field, message } => ApiError::field(field, message),
            ContentServiceError::NotFound(_) => ApiError::NotFound(value.to_string()),
            ContentServiceError::SlugTaken { .. } => ApiError::Conflict(value.to_string()),
            ContentServiceError::Repository(err) => err.into(),
        }
    }
}
