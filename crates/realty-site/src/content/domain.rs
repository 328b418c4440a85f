use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::multilingual::{Locale, MultilingualValue};

/// Identifier wrapper for stored content records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub String);

/// Which section of the site a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Blog,
    Service,
    Process,
    Faq,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [Self::Blog, Self::Service, Self::Process, Self::Faq];

    pub const fn label(self) -> &'static str {
        match self {
            ContentKind::Blog => "blog post",
            ContentKind::Service => "service",
            ContentKind::Process => "process step",
            ContentKind::Faq => "faq entry",
        }
    }

    pub const fn id_prefix(self) -> &'static str {
        match self {
            ContentKind::Blog => "post",
            ContentKind::Service => "service",
            ContentKind::Process => "step",
            ContentKind::Faq => "faq",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ContentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
            ContentStatus::Archived => "archived",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Search and social metadata edited alongside a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoFields {
    pub meta_title: MultilingualValue,
    pub meta_description: MultilingualValue,
    pub meta_keywords: MultilingualValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    pub og_title: MultilingualValue,
    pub og_description: MultilingualValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    pub twitter_title: MultilingualValue,
    pub twitter_description: MultilingualValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_image: Option<String>,
    pub no_index: bool,
}

/// A persisted blog post, service entry, process step, or FAQ entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: ContentId,
    pub kind: ContentKind,
    pub slug: MultilingualValue,
    pub title: MultilingualValue,
    pub excerpt: MultilingualValue,
    pub content: MultilingualValue,
    pub category: MultilingualValue,
    pub tags: Vec<MultilingualValue>,
    pub featured_image: Option<String>,
    pub gallery: Vec<String>,
    pub status: ContentStatus,
    pub featured: bool,
    pub order: i32,
    pub author: Option<String>,
    pub seo: SeoFields,
    pub views: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentRecord {
    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }

    pub fn slug_for(&self, locale: Locale) -> Option<&str> {
        self.slug.resolve(locale)
    }

    pub fn has_slug(&self, slug: &str, locale: Option<Locale>) -> bool {
        match locale {
            Some(locale) => self.slug.get(locale) == slug,
            None => self.slug.iter().any(|(_, candidate)| candidate == slug),
        }
    }
}

/// Editable payload accepted by create and update endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentDraft {
    pub slug: MultilingualValue,
    pub title: MultilingualValue,
    pub excerpt: MultilingualValue,
    pub content: MultilingualValue,
    pub category: MultilingualValue,
    pub tags: Vec<MultilingualValue>,
    pub featured_image: Option<String>,
    pub gallery: Vec<String>,
    pub status: ContentStatus,
    pub featured: bool,
    pub order: i32,
    pub author: Option<String>,
    pub seo: SeoFields,
}
