use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::payload::tests::site;
use super::{seo_router, RepositorySeoSource, SeoResolver};
use crate::content::{
    ContentDraft, ContentId, ContentKind, ContentRecord, ContentRepository, ContentService,
    ContentStatus, MultilingualValue,
};
use crate::error::RepositoryError;
use crate::property::service::tests::{villa_draft, MemoryPropertyRepository};
use crate::property::PropertyService;

#[derive(Default)]
struct MemoryContentRepository {
    records: Mutex<HashMap<ContentId, ContentRecord>>,
}

impl ContentRepository for MemoryContentRepository {
    fn insert(&self, record: ContentRecord) -> Result<ContentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ContentRecord) -> Result<ContentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ContentId) -> Result<Option<ContentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &ContentId) -> Result<ContentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).ok_or(RepositoryError::NotFound)
    }

    fn increment_views(&self, id: &ContentId) -> Result<ContentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.views += 1;
        Ok(record.clone())
    }

    fn list(&self, kind: ContentKind) -> Result<Vec<ContentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.kind == kind)
            .cloned()
            .collect())
    }
}

struct Fixture {
    router: axum::Router,
    property_id: String,
}

fn fixture() -> Fixture {
    let content = ContentService::new(Arc::new(MemoryContentRepository::default()));
    let properties = PropertyService::new(Arc::new(MemoryPropertyRepository::default()));

    content
        .create(
            ContentKind::Blog,
            ContentDraft {
                title: MultilingualValue::new("Renting in Casablanca", "", "Louer à Casablanca"),
                excerpt: MultilingualValue::new("Neighbourhoods and prices.", "", ""),
                status: ContentStatus::Published,
                ..ContentDraft::default()
            },
        )
        .expect("blog created");
    content
        .create(
            ContentKind::Faq,
            ContentDraft {
                title: MultilingualValue::new("Can foreigners buy?", "", "Les étrangers peuvent-ils acheter ?"),
                content: MultilingualValue::new("Yes, with a notary.", "", "Oui, chez un notaire."),
                status: ContentStatus::Published,
                ..ContentDraft::default()
            },
        )
        .expect("faq created");
    let property = properties.create(villa_draft(450_000)).expect("property created");

    let source = RepositorySeoSource::new(content.clone(), properties.clone(), site());
    let resolver = SeoResolver::new(site(), Arc::new(source));
    Fixture {
        router: seo_router(content, properties, resolver),
        property_id: property.id.0,
    }
}

async fn get(router: axum::Router, uri: &str) -> Response {
    router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .expect("route executes")
}

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn blog_payload_endpoint_localizes() {
    let Fixture { router, .. } = fixture();
    let response = get(router, "/api/seo/blog/renting-in-casablanca?lang=fr").await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["meta"]["title"], json!("Louer à Casablanca | Atlas Homes"));
    assert_eq!(payload["meta"]["ogType"], json!("article"));
    assert_eq!(payload["schema"]["@type"], json!("BlogPosting"));
    assert!(payload["breadcrumbs"].is_array());
}

#[tokio::test]
async fn unknown_blog_slug_is_not_found() {
    let Fixture { router, .. } = fixture();
    let response = get(router, "/api/seo/blog/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_lang_is_rejected() {
    let Fixture { router, .. } = fixture();
    let response = get(router, "/api/seo/faq?lang=de").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["field"], json!("lang"));
}

#[tokio::test]
async fn property_and_faq_payloads() {
    let Fixture {
        router,
        property_id,
    } = fixture();
    let response = get(router.clone(), &format!("/api/seo/property/{property_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["schema"]["@type"], json!("RealEstateListing"));
    assert_eq!(payload["schema"]["offers"]["priceCurrency"], json!("EUR"));

    let response = get(router, "/api/seo/faq?lang=fr").await;
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["schema"]["mainEntity"][0]["name"],
        json!("Les étrangers peuvent-ils acheter ?")
    );
}

#[tokio::test]
async fn resolve_endpoint_fetches_subject() {
    let Fixture { router, .. } = fixture();
    let response = get(
        router,
        "/api/seo/resolve?path=/blog/renting-in-casablanca&blog=renting-in-casablanca&lang=en",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let data = &payload["data"];
    assert_eq!(data["title"], json!("Renting in Casablanca | Atlas Homes"));
    assert_eq!(
        data["canonical"],
        json!("https://atlas.example/blog/renting-in-casablanca")
    );
    assert_eq!(data["alternates"].as_array().map(Vec::len), Some(4));
    assert_eq!(data["openGraph"]["type"], json!("article"));
}

#[tokio::test]
async fn resolve_falls_back_when_subject_is_missing() {
    let Fixture { router, .. } = fixture();
    let response = get(
        router,
        "/api/seo/resolve?path=/blog/gone&blog=gone&title=Archived%20post",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["title"], json!("Archived post"));
    assert_eq!(payload["data"]["structuredData"][0]["@type"], json!("WebSite"));
}

#[tokio::test]
async fn head_endpoint_renders_html() {
    let Fixture { router, .. } = fixture();
    let response = get(router, "/api/seo/head?path=/faq&lang=ar").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    let html = String::from_utf8(body.to_vec()).expect("utf8");
    assert!(html.contains(r#"<link rel="canonical" href="https://atlas.example/faq">"#));
    assert!(html.contains(r#"hreflang="ar" href="https://atlas.example/ar/faq""#));
    assert!(html.contains(r#"<meta property="og:locale" content="ar_AR">"#));
}
