use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::payload::{Breadcrumb, SeoPayload, SiteDefaults};
use crate::content::Locale;

const DEFAULT_ROBOTS: &str = "index, follow";
const DEFAULT_OG_TYPE: &str = "website";
const TWITTER_CARD: &str = "summary_large_image";
const X_DEFAULT: &str = "x-default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "key", rename_all = "lowercase")]
pub enum SeoSubject {
    Property(String),
    Blog(String),
}

impl fmt::Display for SeoSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeoSubject::Property(id) => write!(f, "property:{id}"),
            SeoSubject::Blog(slug) => write!(f, "blog:{slug}"),
        }
    }
}

/// Caller-supplied values that sit between fetched data and site defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoOverrides {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub keywords: Option<String>,
    pub og_type: Option<String>,
    /// Replaces every other structured-data object when present.
    pub schema: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeoContext {
    pub path: String,
    pub subject: Option<SeoSubject>,
    pub locale: Locale,
    pub overrides: SeoOverrides,
}

impl SeoContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            subject: None,
            locale: Locale::default(),
            overrides: SeoOverrides::default(),
        }
    }

    pub fn with_subject(mut self, subject: SeoSubject) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_overrides(mut self, overrides: SeoOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternateLink {
    pub hreflang: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub site_name: String,
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TwitterCard {
    pub card: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub site: Option<String>,
}

/// Everything a page head needs, resolved for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Option<String>,
    pub canonical: String,
    pub robots: String,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub structured_data: Vec<Value>,
    pub alternates: Vec<AlternateLink>,
}

/// Resolves metadata from defaults, the request context, and whatever the
/// source returned. Each field independently prefers fetched data, then the
/// caller's override, then the site default.
pub fn resolve(
    defaults: &SiteDefaults,
    context: &SeoContext,
    fetched: Option<&SeoPayload>,
) -> SeoMetadata {
    let meta = fetched.map(|payload| &payload.meta);
    let overrides = &context.overrides;

    let fetched_title = meta.and_then(|meta| non_empty(&meta.title));
    let fetched_description = meta.and_then(|meta| non_empty(&meta.description));

    let title = first([
        fetched_title.clone(),
        non_empty_opt(&overrides.title),
    ])
    .unwrap_or_else(|| defaults.title.clone());
    let description = first([
        fetched_description.clone(),
        non_empty_opt(&overrides.description),
    ])
    .unwrap_or_else(|| defaults.description.clone());
    let keywords = first([
        meta.and_then(|meta| non_empty_opt(&meta.keywords)),
        non_empty_opt(&overrides.keywords),
    ]);

    let canonical = meta
        .and_then(|meta| non_empty_opt(&meta.canonical))
        .map(|url| defaults.absolute(&url))
        .unwrap_or_else(|| defaults.absolute(&normalize_path(&context.path)));

    let image = first([
        meta.and_then(|meta| non_empty_opt(&meta.og_image)),
        non_empty_opt(&overrides.image),
    ])
    .unwrap_or_else(|| defaults.image.clone());
    let image = defaults.absolute(&image);

    let og_title = first([
        meta.and_then(|meta| non_empty_opt(&meta.og_title)),
        fetched_title.clone(),
        non_empty_opt(&overrides.title),
    ])
    .unwrap_or_else(|| defaults.title.clone());
    let og_description = first([
        meta.and_then(|meta| non_empty_opt(&meta.og_description)),
        fetched_description.clone(),
        non_empty_opt(&overrides.description),
    ])
    .unwrap_or_else(|| defaults.description.clone());
    let og_type = first([
        meta.and_then(|meta| non_empty_opt(&meta.og_type)),
        non_empty_opt(&overrides.og_type),
    ])
    .unwrap_or_else(|| DEFAULT_OG_TYPE.to_string());

    let twitter_title = first([
        meta.and_then(|meta| non_empty_opt(&meta.twitter_title)),
        fetched_title,
        non_empty_opt(&overrides.title),
    ])
    .unwrap_or_else(|| defaults.title.clone());
    let twitter_description = first([
        meta.and_then(|meta| non_empty_opt(&meta.twitter_description)),
        fetched_description,
        non_empty_opt(&overrides.description),
    ])
    .unwrap_or_else(|| defaults.description.clone());
    let twitter_image = meta
        .and_then(|meta| non_empty_opt(&meta.twitter_image))
        .map(|url| defaults.absolute(&url))
        .unwrap_or_else(|| image.clone());

    let robots = meta
        .and_then(|meta| non_empty_opt(&meta.robots))
        .unwrap_or_else(|| DEFAULT_ROBOTS.to_string());

    SeoMetadata {
        title,
        description: description.clone(),
        keywords,
        robots,
        open_graph: OpenGraph {
            title: og_title,
            description: og_description,
            image,
            url: canonical.clone(),
            kind: og_type,
            site_name: defaults.site_name.clone(),
            locale: context.locale.og_locale().to_string(),
        },
        twitter: TwitterCard {
            card: TWITTER_CARD.to_string(),
            title: twitter_title,
            description: twitter_description,
            image: twitter_image,
            site: defaults.twitter_handle.clone(),
        },
        structured_data: structured_data(defaults, &description, overrides, fetched),
        alternates: alternates(&canonical),
        canonical,
    }
}

fn structured_data(
    defaults: &SiteDefaults,
    description: &str,
    overrides: &SeoOverrides,
    fetched: Option<&SeoPayload>,
) -> Vec<Value> {
    if let Some(schema) = &overrides.schema {
        return vec![schema.clone()];
    }

    let mut schemas = Vec::new();
    if let Some(payload) = fetched {
        schemas.extend(payload.schema.iter().cloned());
        schemas.extend(payload.schemas.iter().cloned());
        if !payload.breadcrumbs.is_empty() {
            schemas.push(breadcrumb_list(&payload.breadcrumbs, defaults));
        }
    }
    if schemas.is_empty() {
        schemas.push(json!({
            "@context": "https://schema.org",
            "@type": "WebSite",
            "name": defaults.site_name,
            "url": defaults.absolute("/"),
            "description": description,
        }));
    }
    schemas
}

fn breadcrumb_list(breadcrumbs: &[Breadcrumb], defaults: &SiteDefaults) -> Value {
    let items: Vec<Value> = breadcrumbs
        .iter()
        .enumerate()
        .map(|(index, crumb)| {
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "name": crumb.name,
                "item": defaults.absolute(&crumb.url),
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

/// One link per locale plus `x-default`, always four entries.
pub fn alternates(canonical: &str) -> Vec<AlternateLink> {
    let mut links: Vec<AlternateLink> = Locale::ALL
        .iter()
        .map(|locale| AlternateLink {
            hreflang: locale.code().to_string(),
            href: with_locale_prefix(canonical, Some(*locale)),
        })
        .collect();
    links.push(AlternateLink {
        hreflang: X_DEFAULT.to_string(),
        href: with_locale_prefix(canonical, None),
    });
    links
}

/// Rewrites the URL path so it starts with `/{locale}`, replacing any locale
/// prefix already present. `None` strips the prefix.
fn with_locale_prefix(canonical: &str, locale: Option<Locale>) -> String {
    match Url::parse(canonical) {
        Ok(mut url) => {
            let path = prefixed_path(url.path(), locale);
            url.set_path(&path);
            url.to_string()
        }
        Err(_) => {
            let (path, rest) = split_path(canonical);
            format!("{}{rest}", prefixed_path(path, locale))
        }
    }
}

fn prefixed_path(path: &str, locale: Option<Locale>) -> String {
    let bare = strip_locale(path);
    match locale {
        Some(locale) if bare == "/" => format!("/{}", locale.code()),
        Some(locale) => format!("/{}{bare}", locale.code()),
        None => bare.to_string(),
    }
}

fn strip_locale(path: &str) -> &str {
    let trimmed = path.trim_start_matches('/');
    let (first, rest) = trimmed.split_once('/').unwrap_or((trimmed, ""));
    let is_locale = Locale::ALL.iter().any(|locale| locale.code() == first);
    if !is_locale {
        return if path.is_empty() { "/" } else { path };
    }
    // `rest` has lost its leading slash; recover it from the original.
    let start = path.len() - rest.len();
    if rest.is_empty() {
        "/"
    } else {
        &path[start - 1..]
    }
}

fn split_path(relative: &str) -> (&str, &str) {
    match relative.find(['?', '#']) {
        Some(index) => relative.split_at(index),
        None => (relative, ""),
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') || path.starts_with("http") {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn non_empty_opt(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(non_empty)
}

fn first<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates.into_iter().flatten().next()
}
