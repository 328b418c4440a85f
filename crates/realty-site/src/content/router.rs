use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ContentDraft, ContentId, ContentKind, ContentStatus};
use super::multilingual::Locale;
use super::repository::ContentRepository;
use super::service::{ContentQuery, ContentService};
use crate::auth::{AdminSession, TokenAuthority};
use crate::error::ApiError;
use crate::pagination::PageRequest;

pub struct ContentState<R> {
    pub kind: ContentKind,
    pub service: ContentService<R>,
    pub authority: TokenAuthority,
}

impl<R> Clone for ContentState<R> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            service: self.service.clone(),
            authority: self.authority.clone(),
        }
    }
}

impl<R> FromRef<ContentState<R>> for TokenAuthority {
    fn from_ref(state: &ContentState<R>) -> Self {
        state.authority.clone()
    }
}

impl ContentKind {
    pub const fn base_path(self) -> &'static str {
        match self {
            ContentKind::Blog => "/api/blog",
            ContentKind::Service => "/api/services",
            ContentKind::Process => "/api/process",
            ContentKind::Faq => "/api/faq",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentListParams {
    pub status: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SlugParams {
    pub lang: Option<String>,
}

/// Router builder exposing CRUD endpoints for one kind of content.
pub fn content_router<R>(
    kind: ContentKind,
    service: ContentService<R>,
    authority: TokenAuthority,
) -> Router
where
    R: ContentRepository + 'static,
{
    let base = kind.base_path();
    Router::new()
        .route(base, get(list_handler::<R>).post(create_handler::<R>))
        .route(
            &format!("{base}/:id"),
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route(&format!("{base}/slug/:slug"), get(slug_handler::<R>))
        .with_state(ContentState {
            kind,
            service,
            authority,
        })
}

pub(crate) async fn list_handler<R>(
    State(state): State<ContentState<R>>,
    admin: Option<AdminSession>,
    params: Result<Query<ContentListParams>, QueryRejection>,
) -> Result<Response, ApiError>
where
    R: ContentRepository + 'static,
{
    let Query(params) = params?;
    let status = params
        .status
        .as_deref()
        .map(|raw| {
            ContentStatus::parse(raw)
                .ok_or_else(|| ApiError::field("status", format!("unknown status '{raw}'")))
        })
        .transpose()?;

    let query = ContentQuery {
        status,
        category: params.category.filter(|value| !value.trim().is_empty()),
        featured: params.featured,
        include_unpublished: admin.is_some(),
    };
    let page = state.service.list(
        state.kind,
        &query,
        PageRequest::new(params.page, params.limit),
    )?;

    Ok(Json(json!({
        "success": true,
        "data": page.data,
        "pagination": page.pagination,
    }))
    .into_response())
}

pub(crate) async fn get_handler<R>(
    State(state): State<ContentState<R>>,
    admin: Option<AdminSession>,
    Path(id): Path<String>,
) -> Result<Response, ApiError>
where
    R: ContentRepository + 'static,
{
    let record = state.service.get(state.kind, &ContentId(id))?;
    if !record.is_published() && admin.is_none() {
        return Err(ApiError::NotFound(format!("{} not found", state.kind.label())));
    }
    Ok(Json(json!({ "success": true, "data": record })).into_response())
}

pub(crate) async fn slug_handler<R>(
    State(state): State<ContentState<R>>,
    Path(slug): Path<String>,
    params: Result<Query<SlugParams>, QueryRejection>,
) -> Result<Response, ApiError>
where
    R: ContentRepository + 'static,
{
    let Query(params) = params?;
    let locale = parse_lang(params.lang.as_deref())?;
    let record = state.service.read_by_slug(state.kind, &slug, locale)?;
    Ok(Json(json!({ "success": true, "data": record })).into_response())
}

pub(crate) async fn create_handler<R>(
    State(state): State<ContentState<R>>,
    _admin: AdminSession,
    payload: Result<Json<ContentDraft>, JsonRejection>,
) -> Result<Response, ApiError>
where
    R: ContentRepository + 'static,
{
    let Json(draft) = payload?;
    let record = state.service.create(state.kind, draft)?;
    let body = json!({
        "success": true,
        "data": record,
        "message": format!("{} created", state.kind.label()),
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

pub(crate) async fn update_handler<R>(
    State(state): State<ContentState<R>>,
    _admin: AdminSession,
    Path(id): Path<String>,
    payload: Result<Json<ContentDraft>, JsonRejection>,
) -> Result<Response, ApiError>
where
    R: ContentRepository + 'static,
{
    let Json(draft) = payload?;
    let record = state.service.update(state.kind, &ContentId(id), draft)?;
    Ok(Json(json!({ "success": true, "data": record })).into_response())
}

pub(crate) async fn delete_handler<R>(
    State(state): State<ContentState<R>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Response, ApiError>
where
    R: ContentRepository + 'static,
{
    state.service.delete(state.kind, &ContentId(id))?;
    Ok(Json(json!({
        "success": true,
        "message": format!("{} deleted", state.kind.label()),
    }))
    .into_response())
}

pub(crate) fn parse_lang(raw: Option<&str>) -> Result<Option<Locale>, ApiError> {
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| {
            value
                .parse::<Locale>()
                .map_err(|err| ApiError::field("lang", err.to_string()))
        })
        .transpose()
}
