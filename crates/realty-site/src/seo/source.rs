use std::time::Duration;

use reqwest::{StatusCode, Url};

use super::metadata::SeoSubject;
use super::payload::{blog_payload, property_payload, SeoPayload, SiteDefaults};
use crate::content::{ContentKind, ContentRepository, ContentService, ContentServiceError, Locale};
use crate::property::{PropertyId, PropertyRepository, PropertyService, PropertyServiceError};

#[derive(Debug, thiserror::Error)]
pub enum SeoFetchError {
    #[error("{0} not found")]
    NotFound(SeoSubject),
    #[error("seo fetch timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("seo source unreachable: {0}")]
    Transport(String),
    #[error("seo source answered {0}")]
    Status(u16),
    #[error("seo payload could not be decoded: {0}")]
    Decode(String),
    #[error("seo source failed: {0}")]
    Unavailable(String),
}

/// Where subject-specific SEO data comes from.
#[axum::async_trait]
pub trait SeoSource: Send + Sync {
    async fn fetch(&self, subject: &SeoSubject, locale: Locale)
        -> Result<SeoPayload, SeoFetchError>;
}

/// Builds payloads straight from the in-process catalogs.
pub struct RepositorySeoSource<C, P> {
    content: ContentService<C>,
    properties: PropertyService<P>,
    site: SiteDefaults,
}

impl<C, P> RepositorySeoSource<C, P> {
    pub fn new(
        content: ContentService<C>,
        properties: PropertyService<P>,
        site: SiteDefaults,
    ) -> Self {
        Self {
            content,
            properties,
            site,
        }
    }
}

#[axum::async_trait]
impl<C, P> SeoSource for RepositorySeoSource<C, P>
where
    C: ContentRepository + 'static,
    P: PropertyRepository + 'static,
{
    async fn fetch(
        &self,
        subject: &SeoSubject,
        locale: Locale,
    ) -> Result<SeoPayload, SeoFetchError> {
        match subject {
            SeoSubject::Property(id) => {
                let property = self
                    .properties
                    .get(&PropertyId(id.clone()))
                    .map_err(|err| match err {
                        PropertyServiceError::NotFound => SeoFetchError::NotFound(subject.clone()),
                        other => SeoFetchError::Unavailable(other.to_string()),
                    })?;
                Ok(property_payload(&property, &self.site, locale))
            }
            SeoSubject::Blog(slug) => {
                let record = self
                    .content
                    .find_published(ContentKind::Blog, slug, None)
                    .map_err(|err| match err {
                        ContentServiceError::NotFound(_) => SeoFetchError::NotFound(subject.clone()),
                        other => SeoFetchError::Unavailable(other.to_string()),
                    })?;
                Ok(blog_payload(&record, &self.site, locale))
            }
        }
    }
}

/// Fetches payloads from a remote `/seo/*` API, one attempt per call.
#[derive(Debug, Clone)]
pub struct HttpSeoSource {
    client: reqwest::Client,
    api_base: String,
    timeout: Duration,
}

impl HttpSeoSource {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            timeout,
        }
    }

    fn endpoint(&self, subject: &SeoSubject, locale: Locale) -> Result<Url, SeoFetchError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|err| SeoFetchError::Transport(format!("invalid api base: {err}")))?;
        let (kind, key) = match subject {
            SeoSubject::Property(id) => ("property", id.as_str()),
            SeoSubject::Blog(slug) => ("blog", slug.as_str()),
        };
        url.path_segments_mut()
            .map_err(|_| SeoFetchError::Transport("api base cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["seo", kind, key]);
        url.query_pairs_mut().append_pair("lang", locale.code());
        Ok(url)
    }

    async fn request(&self, url: Url, subject: &SeoSubject) -> Result<SeoPayload, SeoFetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| SeoFetchError::Transport(err.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(SeoFetchError::NotFound(subject.clone())),
            status if !status.is_success() => return Err(SeoFetchError::Status(status.as_u16())),
            _ => {}
        }

        response
            .json::<SeoPayload>()
            .await
            .map_err(|err| SeoFetchError::Decode(err.to_string()))
    }
}

#[axum::async_trait]
impl SeoSource for HttpSeoSource {
    async fn fetch(
        &self,
        subject: &SeoSubject,
        locale: Locale,
    ) -> Result<SeoPayload, SeoFetchError> {
        let url = self.endpoint(subject, locale)?;
        tokio::time::timeout(self.timeout, self.request(url, subject))
            .await
            .map_err(|_| SeoFetchError::Timeout(self.timeout))?
    }
}
