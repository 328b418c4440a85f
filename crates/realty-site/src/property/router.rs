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

use super::domain::{ListingType, PropertyDraft, PropertyId};
use super::repository::PropertyRepository;
use super::service::{PropertyQuery, PropertyService};
use crate::auth::{AdminSession, TokenAuthority};
use crate::error::ApiError;
use crate::pagination::PageRequest;

pub struct PropertyState<R> {
    pub service: PropertyService<R>,
    pub authority: TokenAuthority,
}

impl<R> Clone for PropertyState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            authority: self.authority.clone(),
        }
    }
}

impl<R> FromRef<PropertyState<R>> for TokenAuthority {
    fn from_ref(state: &PropertyState<R>) -> Self {
        state.authority.clone()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListParams {
    pub listing: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub featured: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub fn property_router<R>(service: PropertyService<R>, authority: TokenAuthority) -> Router
where
    R: PropertyRepository + 'static,
{
    Router::new()
        .route(
            "/api/properties",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/properties/:id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(PropertyState { service, authority })
}

async fn list_handler<R>(
    State(state): State<PropertyState<R>>,
    params: Result<Query<PropertyListParams>, QueryRejection>,
) -> Result<Response, ApiError>
where
    R: PropertyRepository + 'static,
{
    let Query(params) = params?;
    let listing = params
        .listing
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            ListingType::parse(raw)
                .ok_or_else(|| ApiError::field("listing", format!("unknown listing '{raw}'")))
        })
        .transpose()?;

    let query = PropertyQuery {
        listing,
        property_type: params.property_type.filter(|kind| !kind.trim().is_empty()),
        min_price: params.min_price,
        max_price: params.max_price,
        featured: params.featured,
    };
    let page = state
        .service
        .list(&query, PageRequest::new(params.page, params.limit))?;

    Ok(Json(json!({
        "success": true,
        "data": page.data,
        "pagination": page.pagination,
    }))
    .into_response())
}

async fn get_handler<R>(
    State(state): State<PropertyState<R>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError>
where
    R: PropertyRepository + 'static,
{
    let property = state.service.get(&PropertyId(id))?;
    Ok(Json(json!({ "success": true, "data": property })).into_response())
}

async fn create_handler<R>(
    State(state): State<PropertyState<R>>,
    _admin: AdminSession,
    payload: Result<Json<PropertyDraft>, JsonRejection>,
) -> Result<Response, ApiError>
where
    R: PropertyRepository + 'static,
{
    let Json(draft) = payload?;
    let property = state.service.create(draft)?;
    let body = json!({ "success": true, "data": property, "message": "property created" });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn update_handler<R>(
    State(state): State<PropertyState<R>>,
    _admin: AdminSession,
    Path(id): Path<String>,
    payload: Result<Json<PropertyDraft>, JsonRejection>,
) -> Result<Response, ApiError>
where
    R: PropertyRepository + 'static,
{
    let Json(draft) = payload?;
    let property = state.service.update(&PropertyId(id), draft)?;
    Ok(Json(json!({ "success": true, "data": property })).into_response())
}

async fn delete_handler<R>(
    State(state): State<PropertyState<R>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Response, ApiError>
where
    R: PropertyRepository + 'static,
{
    state.service.delete(&PropertyId(id))?;
    Ok(Json(json!({ "success": true, "message": "property deleted" })).into_response())
}
