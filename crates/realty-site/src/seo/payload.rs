use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::content::{ContentRecord, Locale, MultilingualValue, SeoFields};
use crate::property::Property;

/// Site-wide fallbacks used whenever a page has nothing more specific.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDefaults {
    pub base_url: String,
    pub site_name: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub twitter_handle: Option<String>,
}

impl SiteDefaults {
    /// Turns a site-relative path into an absolute URL; absolute URLs pass through.
    pub fn absolute(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            return path_or_url.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        if path_or_url.starts_with('/') {
            format!("{base}{path_or_url}")
        } else {
            format!("{base}/{path_or_url}")
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoMeta {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub name: String,
    pub url: String,
}

/// SEO data for one subject, as served by `/api/seo/*`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoPayload {
    pub meta: SeoMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breadcrumbs: Vec<Breadcrumb>,
}

const DESCRIPTION_CHARS: usize = 160;

pub fn property_payload(property: &Property, site: &SiteDefaults, locale: Locale) -> SeoPayload {
    let name = text(&property.title, locale).unwrap_or_default();
    let path = format!("/properties/{}", property.id.0);
    let description = text(&property.seo.meta_description, locale)
        .or_else(|| text(&property.description, locale).map(|body| summarize(&body)))
        .unwrap_or_else(|| site.description.clone());
    let image = property
        .seo
        .og_image
        .clone()
        .or_else(|| property.images.first().cloned());

    let mut meta = base_meta(&property.seo, locale, &name, description.clone(), site);
    meta.og_image = image.map(|image| site.absolute(&image));
    meta.og_type = Some("website".to_string());

    let mut listing = json!({
        "@context": "https://schema.org",
        "@type": "RealEstateListing",
        "name": name,
        "description": description,
        "url": site.absolute(&path),
        "image": property.images.iter().map(|image| site.absolute(image)).collect::<Vec<_>>(),
        "offers": {
            "@type": "Offer",
            "price": property.price,
            "priceCurrency": property.currency,
            "availability": property.status.schema_availability(),
        },
        "numberOfRooms": property.bedrooms,
        "floorSize": {
            "@type": "QuantitativeValue",
            "value": property.area_sqm,
            "unitCode": "MTK",
        },
    });
    if let Some(location) = text(&property.location, locale) {
        listing["address"] = json!({ "@type": "PostalAddress", "addressLocality": location });
    }

    SeoPayload {
        meta,
        schema: Some(listing),
        schemas: Vec::new(),
        breadcrumbs: vec![
            crumb(home_label(locale), "/", site),
            crumb(properties_label(locale), "/properties", site),
            crumb(&name, &path, site),
        ],
    }
}

pub fn blog_payload(record: &ContentRecord, site: &SiteDefaults, locale: Locale) -> SeoPayload {
    let headline = text(&record.title, locale).unwrap_or_default();
    let slug = record.slug_for(locale).unwrap_or_default();
    let path = format!("/blog/{slug}");
    let description = text(&record.seo.meta_description, locale)
        .or_else(|| text(&record.excerpt, locale))
        .or_else(|| text(&record.content, locale).map(|body| summarize(&body)))
        .unwrap_or_else(|| site.description.clone());
    let image = record
        .seo
        .og_image
        .clone()
        .or_else(|| record.featured_image.clone())
        .map(|image| site.absolute(&image));

    let mut meta = base_meta(&record.seo, locale, &headline, description.clone(), site);
    meta.og_image = image.clone();
    meta.og_type = Some("article".to_string());
    if meta.keywords.is_none() && !record.tags.is_empty() {
        let tags: Vec<&str> = record
            .tags
            .iter()
            .filter_map(|tag| tag.resolve(locale))
            .collect();
        if !tags.is_empty() {
            meta.keywords = Some(tags.join(", "));
        }
    }

    let mut posting = json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": headline,
        "description": description,
        "url": site.absolute(&path),
        "inLanguage": locale.code(),
        "dateModified": record.updated_at.to_rfc3339(),
        "publisher": { "@type": "Organization", "name": site.site_name },
    });
    if let Some(published) = record.published_at {
        posting["datePublished"] = json!(published.to_rfc3339());
    }
    if let Some(image) = image {
        posting["image"] = json!(image);
    }
    if let Some(author) = &record.author {
        posting["author"] = json!({ "@type": "Person", "name": author });
    }

    SeoPayload {
        meta,
        schema: Some(posting),
        schemas: Vec::new(),
        breadcrumbs: vec![
            crumb(home_label(locale), "/", site),
            crumb(blog_label(locale), "/blog", site),
            crumb(&headline, &path, site),
        ],
    }
}

/// FAQ page markup built from every published entry, in display order.
pub fn faq_payload(entries: &[ContentRecord], site: &SiteDefaults, locale: Locale) -> SeoPayload {
    let title = format!("{} | {}", faq_label(locale), site.site_name);
    let questions: Vec<Value> = entries
        .iter()
        .filter_map(|entry| {
            let question = text(&entry.title, locale)?;
            let answer = text(&entry.content, locale)?;
            Some(json!({
                "@type": "Question",
                "name": question,
                "acceptedAnswer": { "@type": "Answer", "text": answer },
            }))
        })
        .collect();

    SeoPayload {
        meta: SeoMeta {
            title,
            description: site.description.clone(),
            og_type: Some("website".to_string()),
            ..SeoMeta::default()
        },
        schema: Some(json!({
            "@context": "https://schema.org",
            "@type": "FAQPage",
            "mainEntity": questions,
        })),
        schemas: Vec::new(),
        breadcrumbs: vec![
            crumb(home_label(locale), "/", site),
            crumb(faq_label(locale), "/faq", site),
        ],
    }
}

fn base_meta(
    seo: &SeoFields,
    locale: Locale,
    name: &str,
    description: String,
    site: &SiteDefaults,
) -> SeoMeta {
    let title = text(&seo.meta_title, locale)
        .unwrap_or_else(|| format!("{name} | {}", site.site_name));
    SeoMeta {
        title,
        description,
        keywords: text(&seo.meta_keywords, locale),
        canonical: seo
            .canonical_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| site.absolute(url)),
        robots: seo.no_index.then(|| "noindex, nofollow".to_string()),
        og_title: text(&seo.og_title, locale),
        og_description: text(&seo.og_description, locale),
        og_image: None,
        og_type: None,
        twitter_title: text(&seo.twitter_title, locale),
        twitter_description: text(&seo.twitter_description, locale),
        twitter_image: seo.twitter_image.as_deref().map(|image| site.absolute(image)),
    }
}

fn text(value: &MultilingualValue, locale: Locale) -> Option<String> {
    value.resolve(locale).map(|text| text.trim().to_string())
}

/// Plain-text summary of possibly HTML content.
fn summarize(body: &str) -> String {
    let mut plain = String::with_capacity(body.len());
    let mut in_tag = false;
    for c in body.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                plain.push(' ');
            }
            _ if !in_tag => plain.push(c),
            _ => {}
        }
    }
    let collapsed = plain.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= DESCRIPTION_CHARS {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(DESCRIPTION_CHARS - 1).collect();
    cut.push('…');
    cut
}

fn crumb(name: &str, path: &str, site: &SiteDefaults) -> Breadcrumb {
    Breadcrumb {
        name: name.to_string(),
        url: site.absolute(path),
    }
}

fn home_label(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Home",
        Locale::Ar => "الرئيسية",
        Locale::Fr => "Accueil",
    }
}

fn properties_label(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Properties",
        Locale::Ar => "العقارات",
        Locale::Fr => "Biens",
    }
}

fn blog_label(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Blog",
        Locale::Ar => "المدونة",
        Locale::Fr => "Blog",
    }
}

fn faq_label(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Frequently Asked Questions",
        Locale::Ar => "الأسئلة الشائعة",
        Locale::Fr => "Questions fréquentes",
    }
}
