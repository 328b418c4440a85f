use std::sync::Arc;
use std::time::Duration;

use realty_site::content::Locale;
use realty_site::seo::{
    HeadDocument, HeadElement, HttpSeoSource, MetaAttr, SeoContext, SeoOverrides, SeoResolver,
    SeoSubject, SiteDefaults,
};
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn site() -> SiteDefaults {
    SiteDefaults {
        base_url: "https://atlas.example".to_string(),
        site_name: "Atlas Homes".to_string(),
        title: "Atlas Homes | Villas & apartments".to_string(),
        description: "Homes for sale and rent across Morocco.".to_string(),
        image: "/images/og-default.jpg".to_string(),
        twitter_handle: Some("@atlashomes".to_string()),
    }
}

fn page_head() -> HeadDocument {
    let mut head = HeadDocument::new();
    head.push(HeadElement::Meta {
        attr: MetaAttr::Name,
        key: "viewport".to_string(),
        content: "width=device-width, initial-scale=1".to_string(),
    });
    head
}

async fn remote_resolver(delay: Duration, timeout: Duration) -> (MockServer, SeoResolver) {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/seo/property/prop-000007"))
        .and(query_param("lang", "fr"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "meta": {
                        "title": "Villa vue mer à Anfa | Atlas Homes",
                        "description": "Cinq chambres, jardin et piscine.",
                        "ogImage": "/images/properties/anfa.jpg",
                        "ogType": "website"
                    },
                    "schema": { "@context": "https://schema.org", "@type": "RealEstateListing" },
                    "breadcrumbs": [
                        { "name": "Accueil", "url": "https://atlas.example/" },
                        { "name": "Biens", "url": "https://atlas.example/properties" }
                    ]
                }))
                .set_delay(delay),
        )
        .mount(&mock_server)
        .await;

    let source = HttpSeoSource::new(mock_server.uri(), timeout);
    (mock_server, SeoResolver::new(site(), Arc::new(source)))
}

#[tokio::test]
async fn navigating_between_pages_rewrites_managed_tags_only() {
    let (_server, resolver) = remote_resolver(Duration::ZERO, Duration::from_secs(2)).await;
    let mut head = page_head();

    let listing = SeoContext::new("/fr/properties/prop-000007")
        .with_subject(SeoSubject::Property("prop-000007".to_string()))
        .with_locale(Locale::Fr);
    let metadata = resolver.resolve(&listing).await;
    head.apply(&metadata);

    assert_eq!(head.title(), Some("Villa vue mer à Anfa | Atlas Homes"));
    assert_eq!(
        head.meta(MetaAttr::Property, "og:image"),
        Some("https://atlas.example/images/properties/anfa.jpg")
    );
    assert_eq!(head.meta(MetaAttr::Property, "og:locale"), Some("fr_FR"));
    assert!(head
        .structured_data()
        .iter()
        .any(|json| json.contains("RealEstateListing")));
    assert!(head
        .structured_data()
        .iter()
        .any(|json| json.contains("BreadcrumbList")));

    let about = SeoContext::new("/about");
    let metadata = resolver.resolve(&about).await;
    head.apply(&metadata);

    assert_eq!(head.title(), Some(site().title.as_str()));
    assert_eq!(head.canonical(), Some("https://atlas.example/about"));
    assert_eq!(head.structured_data().len(), 1);
    assert!(head.structured_data()[0].contains("WebSite"));

    let alternates = head.alternates();
    assert_eq!(alternates.len(), 4);
    assert_eq!(alternates[1].href, "https://atlas.example/ar/about");
    assert_eq!(alternates[3].hreflang, "x-default");
    assert_eq!(alternates[3].href, "https://atlas.example/about");

    assert_eq!(
        head.meta(MetaAttr::Name, "viewport"),
        Some("width=device-width, initial-scale=1")
    );
    assert_eq!(head.meta(MetaAttr::Property, "og:locale"), Some("en_US"));
}

#[tokio::test]
async fn slow_remote_source_falls_back_to_overrides() {
    let (_server, resolver) =
        remote_resolver(Duration::from_millis(500), Duration::from_millis(50)).await;
    let context = SeoContext::new("/fr/properties/prop-000007")
        .with_subject(SeoSubject::Property("prop-000007".to_string()))
        .with_locale(Locale::Fr)
        .with_overrides(SeoOverrides {
            title: Some("Villa à Anfa".to_string()),
            ..SeoOverrides::default()
        });

    let metadata = resolver.resolve(&context).await;
    assert_eq!(metadata.title, "Villa à Anfa");
    assert_eq!(metadata.description, site().description);
    assert_eq!(
        metadata.canonical,
        "https://atlas.example/fr/properties/prop-000007"
    );

    let mut head = page_head();
    head.apply(&metadata);
    let rendered = head.render();
    head.apply(&metadata);
    assert_eq!(head.render(), rendered);
}
