use crate::infra::{
    AppState, InMemoryContactRepository, InMemoryContentRepository, InMemoryPropertyRepository,
};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use realty_site::auth::{auth_router, AdminCredentials, AuthState, TokenAuthority};
use realty_site::contact::{contact_router, ContactService};
use realty_site::content::{content_router, ContentKind, ContentService};
use realty_site::property::{property_router, PropertyService};
use realty_site::seo::{seo_router, SeoResolver};
use serde_json::json;

/// Everything the HTTP surface needs, already wired to its stores.
#[derive(Clone)]
pub(crate) struct SiteServices {
    pub(crate) content: ContentService<InMemoryContentRepository>,
    pub(crate) properties: PropertyService<InMemoryPropertyRepository>,
    pub(crate) contacts: ContactService<InMemoryContactRepository>,
    pub(crate) resolver: SeoResolver,
    pub(crate) authority: TokenAuthority,
    pub(crate) credentials: Option<AdminCredentials>,
}

pub(crate) fn with_site_routes(services: SiteServices) -> Router {
    let SiteServices {
        content,
        properties,
        contacts,
        resolver,
        authority,
        credentials,
    } = services;

    let mut router = Router::new().merge(auth_router(AuthState {
        authority: authority.clone(),
        credentials,
    }));
    for kind in ContentKind::ALL {
        router = router.merge(content_router(kind, content.clone(), authority.clone()));
    }

    router
        .merge(property_router(properties.clone(), authority.clone()))
        .merge(contact_router(contacts, authority))
        .merge(seo_router(content, properties, resolver))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
