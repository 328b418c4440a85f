use axum::{
    extract::rejection::QueryRejection,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::head::HeadDocument;
use super::metadata::{SeoContext, SeoOverrides, SeoSubject};
use super::payload::{blog_payload, faq_payload, property_payload};
use super::resolver::SeoResolver;
use crate::content::router::parse_lang;
use crate::content::{ContentKind, ContentQuery, ContentRepository, ContentService};
use crate::error::ApiError;
use crate::pagination::{PageRequest, MAX_LIMIT};
use crate::property::{PropertyId, PropertyRepository, PropertyService};

pub struct SeoState<C, P> {
    pub content: ContentService<C>,
    pub properties: PropertyService<P>,
    pub resolver: SeoResolver,
}

impl<C, P> Clone for SeoState<C, P> {
    fn clone(&self) -> Self {
        Self {
            content: self.content.clone(),
            properties: self.properties.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LangParams {
    pub lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveParams {
    pub path: Option<String>,
    pub property: Option<String>,
    pub blog: Option<String>,
    pub lang: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub keywords: Option<String>,
    pub og_type: Option<String>,
}

impl ResolveParams {
    fn into_context(self) -> Result<SeoContext, ApiError> {
        let locale = parse_lang(self.lang.as_deref())?.unwrap_or_default();
        let subject = match (non_blank(self.property), non_blank(self.blog)) {
            (Some(id), _) => Some(SeoSubject::Property(id)),
            (None, Some(slug)) => Some(SeoSubject::Blog(slug)),
            (None, None) => None,
        };
        let mut context = SeoContext::new(non_blank(self.path).unwrap_or_else(|| "/".to_string()))
            .with_locale(locale)
            .with_overrides(SeoOverrides {
                title: self.title,
                description: self.description,
                image: self.image,
                keywords: self.keywords,
                og_type: self.og_type,
                schema: None,
            });
        context.subject = subject;
        Ok(context)
    }
}

pub fn seo_router<C, P>(
    content: ContentService<C>,
    properties: PropertyService<P>,
    resolver: SeoResolver,
) -> Router
where
    C: ContentRepository + 'static,
    P: PropertyRepository + 'static,
{
    Router::new()
        .route("/api/seo/property/:id", get(property_handler::<C, P>))
        .route("/api/seo/blog/:slug", get(blog_handler::<C, P>))
        .route("/api/seo/faq", get(faq_handler::<C, P>))
        .route("/api/seo/resolve", get(resolve_handler::<C, P>))
        .route("/api/seo/head", get(head_handler::<C, P>))
        .with_state(SeoState {
            content,
            properties,
            resolver,
        })
}

async fn property_handler<C, P>(
    State(state): State<SeoState<C, P>>,
    Path(id): Path<String>,
    params: Result<Query<LangParams>, QueryRejection>,
) -> Result<Response, ApiError>
where
    C: ContentRepository + 'static,
    P: PropertyRepository + 'static,
{
    let Query(params) = params?;
    let locale = parse_lang(params.lang.as_deref())?.unwrap_or_default();
    let property = state.properties.get(&PropertyId(id))?;
    let payload = property_payload(&property, state.resolver.defaults(), locale);
    Ok(Json(payload).into_response())
}

async fn blog_handler<C, P>(
    State(state): State<SeoState<C, P>>,
    Path(slug): Path<String>,
    params: Result<Query<LangParams>, QueryRejection>,
) -> Result<Response, ApiError>
where
    C: ContentRepository + 'static,
    P: PropertyRepository + 'static,
{
    let Query(params) = params?;
    let locale = parse_lang(params.lang.as_deref())?.unwrap_or_default();
    let record = state
        .content
        .find_published(ContentKind::Blog, &slug, None)?;
    let payload = blog_payload(&record, state.resolver.defaults(), locale);
    Ok(Json(payload).into_response())
}

async fn faq_handler<C, P>(
    State(state): State<SeoState<C, P>>,
    params: Result<Query<LangParams>, QueryRejection>,
) -> Result<Response, ApiError>
where
    C: ContentRepository + 'static,
    P: PropertyRepository + 'static,
{
    let Query(params) = params?;
    let locale = parse_lang(params.lang.as_deref())?.unwrap_or_default();
    let entries = state.content.list(
        ContentKind::Faq,
        &ContentQuery::default(),
        PageRequest::new(Some(1), Some(MAX_LIMIT)),
    )?;
    let payload = faq_payload(&entries.data, state.resolver.defaults(), locale);
    Ok(Json(payload).into_response())
}

async fn resolve_handler<C, P>(
    State(state): State<SeoState<C, P>>,
    params: Result<Query<ResolveParams>, QueryRejection>,
) -> Result<Response, ApiError>
where
    C: ContentRepository + 'static,
    P: PropertyRepository + 'static,
{
    let Query(params) = params?;
    let context = params.into_context()?;
    let metadata = state.resolver.resolve(&context).await;
    Ok(Json(json!({ "success": true, "data": metadata })).into_response())
}

async fn head_handler<C, P>(
    State(state): State<SeoState<C, P>>,
    params: Result<Query<ResolveParams>, QueryRejection>,
) -> Result<Response, ApiError>
where
    C: ContentRepository + 'static,
    P: PropertyRepository + 'static,
{
    let Query(params) = params?;
    let context = params.into_context()?;
    let metadata = state.resolver.resolve(&context).await;
    let mut head = HeadDocument::new();
    head.apply(&metadata);
    Ok(Html(head.render()).into_response())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
