use std::fmt::Write as _;

use super::metadata::{AlternateLink, SeoMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaAttr {
    Name,
    Property,
}

impl MetaAttr {
    const fn attribute(self) -> &'static str {
        match self {
            MetaAttr::Name => "name",
            MetaAttr::Property => "property",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadElement {
    Meta {
        attr: MetaAttr,
        key: String,
        content: String,
    },
    Link {
        rel: String,
        href: String,
        hreflang: Option<String>,
    },
    JsonLd(String),
}

/// In-memory model of a page `<head>`. Tags not managed by [`apply`] are left
/// untouched and keep their position.
///
/// Alternate links and structured data written by [`apply`] are kept apart
/// from template elements and render after them.
///
/// [`apply`]: HeadDocument::apply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadDocument {
    title: Option<String>,
    elements: Vec<HeadElement>,
    injected: Vec<HeadElement>,
}

impl HeadDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn elements(&self) -> impl Iterator<Item = &HeadElement> {
        self.elements.iter().chain(&self.injected)
    }

    pub fn push(&mut self, element: HeadElement) {
        self.elements.push(element);
    }

    pub fn meta(&self, attr: MetaAttr, key: &str) -> Option<&str> {
        self.elements.iter().find_map(|element| match element {
            HeadElement::Meta {
                attr: a,
                key: k,
                content,
            } if *a == attr && k == key => Some(content.as_str()),
            _ => None,
        })
    }

    pub fn canonical(&self) -> Option<&str> {
        self.elements.iter().find_map(|element| match element {
            HeadElement::Link { rel, href, .. } if rel == "canonical" => Some(href.as_str()),
            _ => None,
        })
    }

    pub fn alternates(&self) -> Vec<AlternateLink> {
        self.elements()
            .filter_map(|element| match element {
                HeadElement::Link {
                    rel,
                    href,
                    hreflang: Some(lang),
                } if rel == "alternate" => Some(AlternateLink {
                    hreflang: lang.clone(),
                    href: href.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn structured_data(&self) -> Vec<&str> {
        self.elements()
            .filter_map(|element| match element {
                HeadElement::JsonLd(json) => Some(json.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Writes resolved metadata into the head. Alternate links and structured
    /// data from an earlier apply are replaced, so applying the same metadata
    /// twice leaves the document unchanged.
    pub fn apply(&mut self, metadata: &SeoMetadata) {
        self.title = Some(metadata.title.clone());

        self.upsert_meta(MetaAttr::Name, "description", Some(&metadata.description));
        self.upsert_meta(MetaAttr::Name, "keywords", metadata.keywords.as_deref());
        self.upsert_meta(MetaAttr::Name, "robots", Some(&metadata.robots));

        let og = &metadata.open_graph;
        self.upsert_meta(MetaAttr::Property, "og:title", Some(&og.title));
        self.upsert_meta(MetaAttr::Property, "og:description", Some(&og.description));
        self.upsert_meta(MetaAttr::Property, "og:image", Some(&og.image));
        self.upsert_meta(MetaAttr::Property, "og:url", Some(&og.url));
        self.upsert_meta(MetaAttr::Property, "og:type", Some(&og.kind));
        self.upsert_meta(MetaAttr::Property, "og:site_name", Some(&og.site_name));
        self.upsert_meta(MetaAttr::Property, "og:locale", Some(&og.locale));

        let twitter = &metadata.twitter;
        self.upsert_meta(MetaAttr::Name, "twitter:card", Some(&twitter.card));
        self.upsert_meta(MetaAttr::Name, "twitter:title", Some(&twitter.title));
        self.upsert_meta(MetaAttr::Name, "twitter:description", Some(&twitter.description));
        self.upsert_meta(MetaAttr::Name, "twitter:image", Some(&twitter.image));
        self.upsert_meta(MetaAttr::Name, "twitter:site", twitter.site.as_deref());

        self.upsert_canonical(&metadata.canonical);

        self.injected.clear();
        for link in &metadata.alternates {
            self.injected.push(HeadElement::Link {
                rel: "alternate".to_string(),
                href: link.href.clone(),
                hreflang: Some(link.hreflang.clone()),
            });
        }
        for schema in &metadata.structured_data {
            self.injected.push(HeadElement::JsonLd(schema.to_string()));
        }
    }

    fn upsert_meta(&mut self, attr: MetaAttr, key: &str, content: Option<&str>) {
        let position = self.elements.iter().position(|element| {
            matches!(element, HeadElement::Meta { attr: a, key: k, .. } if *a == attr && k == key)
        });
        match (position, content) {
            (Some(index), Some(content)) => {
                self.elements[index] = HeadElement::Meta {
                    attr,
                    key: key.to_string(),
                    content: content.to_string(),
                };
            }
            (Some(index), None) => {
                self.elements.remove(index);
            }
            (None, Some(content)) => self.elements.push(HeadElement::Meta {
                attr,
                key: key.to_string(),
                content: content.to_string(),
            }),
            (None, None) => {}
        }
    }

    fn upsert_canonical(&mut self, href: &str) {
        let element = HeadElement::Link {
            rel: "canonical".to_string(),
            href: href.to_string(),
            hreflang: None,
        };
        match self.elements.iter().position(
            |element| matches!(element, HeadElement::Link { rel, .. } if rel == "canonical"),
        ) {
            Some(index) => self.elements[index] = element,
            None => self.elements.push(element),
        }
    }

    /// Serializes the head contents as HTML, one tag per line.
    pub fn render(&self) -> String {
        let mut html = String::new();
        if let Some(title) = &self.title {
            let _ = writeln!(html, "<title>{}</title>", escape(title));
        }
        for element in self.elements() {
            let _ = match element {
                HeadElement::Meta { attr, key, content } => writeln!(
                    html,
                    r#"<meta {}="{}" content="{}">"#,
                    attr.attribute(),
                    escape(key),
                    escape(content)
                ),
                HeadElement::Link {
                    rel,
                    href,
                    hreflang: Some(lang),
                } => writeln!(
                    html,
                    r#"<link rel="{}" hreflang="{}" href="{}">"#,
                    escape(rel),
                    escape(lang),
                    escape(href)
                ),
                HeadElement::Link { rel, href, .. } => writeln!(
                    html,
                    r#"<link rel="{}" href="{}">"#,
                    escape(rel),
                    escape(href)
                ),
                HeadElement::JsonLd(json) => writeln!(
                    html,
                    r#"<script type="application/ld+json">{}</script>"#,
                    json.replace("</", r"<\/")
                ),
            };
        }
        html
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
