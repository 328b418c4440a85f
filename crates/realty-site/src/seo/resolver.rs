use std::sync::Arc;

use super::metadata::{resolve, SeoContext, SeoMetadata};
use super::payload::SiteDefaults;
use super::source::SeoSource;

/// Fetches subject data when the context names one and resolves metadata.
/// Fetch failures never escape; the page falls back to defaults and overrides.
#[derive(Clone)]
pub struct SeoResolver {
    defaults: SiteDefaults,
    source: Option<Arc<dyn SeoSource>>,
}

impl std::fmt::Debug for SeoResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeoResolver")
            .field("defaults", &self.defaults)
            .field("source", &self.source.is_some())
            .finish()
    }
}

impl SeoResolver {
    pub fn new(defaults: SiteDefaults, source: Arc<dyn SeoSource>) -> Self {
        Self {
            defaults,
            source: Some(source),
        }
    }

    pub fn without_source(defaults: SiteDefaults) -> Self {
        Self {
            defaults,
            source: None,
        }
    }

    pub fn defaults(&self) -> &SiteDefaults {
        &self.defaults
    }

    pub async fn resolve(&self, context: &SeoContext) -> SeoMetadata {
        let fetched = match (&context.subject, &self.source) {
            (Some(subject), Some(source)) => match source.fetch(subject, context.locale).await {
                Ok(payload) => Some(payload),
                Err(err) => {
                    tracing::warn!(
                        subject = %subject,
                        path = %context.path,
                        error = %err,
                        "seo fetch failed, falling back to defaults"
                    );
                    None
                }
            },
            (Some(subject), None) => {
                tracing::warn!(subject = %subject, "no seo source configured");
                None
            }
            (None, _) => None,
        };
        resolve(&self.defaults, context, fetched.as_ref())
    }
}
