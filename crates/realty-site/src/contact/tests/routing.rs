use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::contact::domain::ContactStatus;
use crate::contact::router::contact_router;
use crate::contact::service::ContactService;

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn submit_with_bad_email_is_rejected() {
    let (service, repository, _) = build_service();
    let router = contact_router(service, authority());

    let response = router
        .oneshot(post_json(
            "/api/contact-requests",
            json!({ "name": "A", "email": "bad-email", "message": "hi" }).to_string(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));
    assert_eq!(payload["field"], json!("email"));
    assert!(repository.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn submit_without_phone_returns_created() {
    let (service, _, publisher) = build_service();
    let router = contact_router(service, authority());

    let response = router
        .oneshot(post_json(
            "/api/contact-requests",
            json!({
                "name": "Salma",
                "email": "salma@example.com",
                "message": "Do you have rentals in Agadir?",
                "propertyType": "apartment",
                "budget": 9000
            })
            .to_string(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["data"]["status"], json!("new"));
    assert_eq!(payload["data"]["propertyType"], json!("apartment"));
    assert_eq!(payload["data"]["budget"], json!("9000"));
    assert_eq!(payload["data"]["phone"], json!(null));
    assert!(payload["message"].is_string());
    assert_eq!(publisher.jobs.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_required_field_names_the_field() {
    let (service, _, _) = build_service();
    let router = contact_router(service, authority());

    let response = router
        .oneshot(post_json(
            "/api/contact-requests",
            json!({ "name": "Salma", "email": "salma@example.com", "message": "  " }).to_string(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["field"], json!("message"));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (service, _, _) = build_service();
    let router = contact_router(service, authority());

    let response = router
        .oneshot(post_json("/api/contact-requests", "{not json".to_string()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));
}

#[tokio::test]
async fn listing_requires_admin_token() {
    let (service, _, _) = build_service();
    let router = contact_router(service, authority());

    let response = router
        .oneshot(
            Request::get("/api/contact-requests")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_lists_new_requests_with_pagination() {
    let (service, _, _) = build_service();
    let authority = authority();
    for index in 0..12 {
        service
            .submit(submission(&format!("Client {index}"), "c@example.com", "hi"))
            .expect("stored");
    }
    let first = service
        .submit(submission("Read one", "r@example.com", "hi"))
        .expect("stored");
    service
        .update_status(&first.id, ContactStatus::Read)
        .expect("updated");
    let router = contact_router(service, authority.clone());

    let response = router
        .oneshot(
            Request::get("/api/contact-requests?status=new&page=1&limit=10&sortBy=name&order=asc")
                .header(header::AUTHORIZATION, bearer(&authority))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let data = payload["data"].as_array().expect("array");
    assert_eq!(data.len(), 10);
    assert!(data.iter().all(|item| item["status"] == json!("new")));
    assert_eq!(
        payload["pagination"],
        json!({ "total": 12, "page": 1, "limit": 10, "pages": 2 })
    );
}

#[tokio::test]
async fn unknown_status_filter_is_rejected() {
    let (service, _, _) = build_service();
    let authority = authority();
    let router = contact_router(service, authority.clone());

    let response = router
        .oneshot(
            Request::get("/api/contact-requests?status=archived")
                .header(header::AUTHORIZATION, bearer(&authority))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_marks_replied_and_keeps_fields() {
    let (service, _, _) = build_service();
    let authority = authority();
    let stored = service
        .submit(submission("Amine", "amine@example.com", "Call me back"))
        .expect("stored");
    let router = contact_router(service, authority.clone());

    let response = router
        .clone()
        .oneshot(
            Request::put(format!("/api/contact-requests/{}", stored.id.0))
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, bearer(&authority))
                .body(Body::from(json!({ "status": "replied" }).to_string()))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["status"], json!("replied"));
    assert_eq!(payload["data"]["name"], json!("Amine"));
    assert_eq!(payload["data"]["email"], json!("amine@example.com"));
    assert_eq!(payload["data"]["message"], json!("Call me back"));

    let response = router
        .clone()
        .oneshot(
            Request::put(format!("/api/contact-requests/{}", stored.id.0))
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, bearer(&authority))
                .body(Body::from(json!({ "status": "closed" }).to_string()))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(
            Request::put("/api/contact-requests/contact-missing")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, bearer(&authority))
                .body(Body::from(json!({ "status": "read" }).to_string()))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_and_stats() {
    let (service, repository, _) = build_service();
    let authority = authority();
    let stored = service
        .submit(submission("Amine", "amine@example.com", "Hello"))
        .expect("stored");
    service
        .submit(submission("Sara", "sara@example.com", "Hello"))
        .expect("stored");
    let router = contact_router(service, authority.clone());

    let response = router
        .clone()
        .oneshot(
            Request::delete(format!("/api/contact-requests/{}", stored.id.0))
                .header(header::AUTHORIZATION, bearer(&authority))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(true));
    assert!(!repository.records.lock().unwrap().contains_key(&stored.id));

    let response = router
        .clone()
        .oneshot(
            Request::delete(format!("/api/contact-requests/{}", stored.id.0))
                .header(header::AUTHORIZATION, bearer(&authority))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .oneshot(
            Request::get("/api/contact-requests/stats")
                .header(header::AUTHORIZATION, bearer(&authority))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["data"],
        json!({ "total": 1, "new": 1, "read": 0, "replied": 0 })
    );
}

#[tokio::test]
async fn repository_outage_is_internal_error() {
    let service = ContactService::new(
        Arc::new(UnavailableContactRepository),
        Arc::new(RecordingPublisher::default()),
    );
    let router = contact_router(service, authority());

    let response = router
        .oneshot(post_json(
            "/api/contact-requests",
            json!({ "name": "A", "email": "a@example.com", "message": "hi" }).to_string(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
