//! SEO metadata: per-subject payloads, a pure resolver, and the step that
//! writes resolved metadata into a page head.

mod head;
mod metadata;
mod payload;
mod resolver;
pub mod router;
mod source;

#[cfg(test)]
mod tests;

pub use head::{HeadDocument, HeadElement, MetaAttr};
pub use metadata::{
    alternates, resolve, AlternateLink, OpenGraph, SeoContext, SeoMetadata, SeoOverrides,
    SeoSubject, TwitterCard,
};
pub use payload::{
    blog_payload, faq_payload, property_payload, Breadcrumb, SeoMeta, SeoPayload, SiteDefaults,
};
pub use resolver::SeoResolver;
pub use router::seo_router;
pub use source::{HttpSeoSource, RepositorySeoSource, SeoFetchError, SeoSource};
