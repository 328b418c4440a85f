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

use super::domain::{ContactId, ContactStatus, ContactSubmission};
use super::repository::ContactRepository;
use super::service::{ContactQuery, ContactService, ContactSortField};
use crate::auth::{AdminSession, TokenAuthority};
use crate::error::ApiError;
use crate::pagination::{PageRequest, SortOrder};

pub struct ContactState<R> {
    pub service: ContactService<R>,
    pub authority: TokenAuthority,
}

impl<R> Clone for ContactState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            authority: self.authority.clone(),
        }
    }
}

impl<R> FromRef<ContactState<R>> for TokenAuthority {
    fn from_ref(state: &ContactState<R>) -> Self {
        state.authority.clone()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListParams {
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

pub fn contact_router<R>(service: ContactService<R>, authority: TokenAuthority) -> Router
where
    R: ContactRepository + 'static,
{
    Router::new()
        .route(
            "/api/contact-requests",
            get(list_handler::<R>).post(submit_handler::<R>),
        )
        .route("/api/contact-requests/stats", get(stats_handler::<R>))
        .route(
            "/api/contact-requests/:id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(ContactState { service, authority })
}

async fn submit_handler<R>(
    State(state): State<ContactState<R>>,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Response, ApiError>
where
    R: ContactRepository + 'static,
{
    let Json(submission) = payload?;
    let request = state.service.submit(submission)?;
    let body = json!({
        "success": true,
        "data": request,
        "message": "Thank you, your request has been received",
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn list_handler<R>(
    State(state): State<ContactState<R>>,
    _admin: AdminSession,
    params: Result<Query<ContactListParams>, QueryRejection>,
) -> Result<Response, ApiError>
where
    R: ContactRepository + 'static,
{
    let Query(params) = params?;
    let query = ContactQuery {
        status: parse_status(params.status.as_deref())?,
        sort_by: ContactSortField::parse(params.sort_by.as_deref()),
        order: SortOrder::parse(params.order.as_deref()),
    };
    let page = state
        .service
        .list(query, PageRequest::new(params.page, params.limit))?;

    Ok(Json(json!({
        "success": true,
        "data": page.data,
        "pagination": page.pagination,
    }))
    .into_response())
}

async fn stats_handler<R>(
    State(state): State<ContactState<R>>,
    _admin: AdminSession,
) -> Result<Response, ApiError>
where
    R: ContactRepository + 'static,
{
    let stats = state.service.stats()?;
    Ok(Json(json!({ "success": true, "data": stats })).into_response())
}

async fn get_handler<R>(
    State(state): State<ContactState<R>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Response, ApiError>
where
    R: ContactRepository + 'static,
{
    let request = state.service.get(&ContactId(id))?;
    Ok(Json(json!({ "success": true, "data": request })).into_response())
}

async fn update_handler<R>(
    State(state): State<ContactState<R>>,
    _admin: AdminSession,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Response, ApiError>
where
    R: ContactRepository + 'static,
{
    let Json(update) = payload?;
    let status = parse_status(update.status.as_deref())?
        .ok_or_else(|| ApiError::field("status", "status is required"))?;
    let request = state.service.update_status(&ContactId(id), status)?;
    Ok(Json(json!({ "success": true, "data": request })).into_response())
}

async fn delete_handler<R>(
    State(state): State<ContactState<R>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Response, ApiError>
where
    R: ContactRepository + 'static,
{
    state.service.delete(&ContactId(id))?;
    Ok(Json(json!({ "success": true, "message": "contact request deleted" })).into_response())
}

fn parse_status(raw: Option<&str>) -> Result<Option<ContactStatus>, ApiError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => ContactStatus::parse(value).map(Some).ok_or_else(|| {
            ApiError::field(
                "status",
                format!("status must be one of new, read, replied (got '{value}')"),
            )
        }),
    }
}
