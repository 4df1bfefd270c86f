//! HTTP tests for the router, backed by an in-memory SQLite store.

mod support;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use coupon_service_lib::api::{create_router, AppState};
use domain::Role;

use support::{claims, jwt_config, Fixture, PASSWORD};

const ENTERPRISE: &str = "contact@atoniosfoods.com";

// =============================================================================
// Helpers
// =============================================================================

fn app(fixture: &Fixture) -> Router {
    create_router(AppState::from_database(fixture.db.clone(), jwt_config()))
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

// =============================================================================
// Health and public routes
// =============================================================================

#[tokio::test]
async fn test_health_reports_database() {
    let fixture = Fixture::new().await;

    let (status, body) = send(app(&fixture), Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_coupon_listing_is_public_and_paginated() {
    let fixture = Fixture::new().await;
    fixture.enterprise(ENTERPRISE, "ATONIOSFOODS").await;
    for i in 0..12 {
        fixture.coupon(&format!("c{:02}", i), 5, ENTERPRISE).await;
    }

    let (status, first) = send(app(&fixture), Method::GET, "/coupons", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["coupons"].as_array().unwrap().len(), 10);
    let next = first["next"].as_str().unwrap().to_string();

    let (status, second) = send(
        app(&fixture),
        Method::GET,
        &format!("/coupons?next={}", next),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["coupons"].as_array().unwrap().len(), 2);
    assert!(second.get("next").is_none());
}

#[tokio::test]
async fn test_get_coupon_includes_enterprise() {
    let fixture = Fixture::new().await;
    fixture.enterprise(ENTERPRISE, "ATONIOSFOODS").await;
    fixture.coupon("c1", 5, ENTERPRISE).await;

    let (status, body) = send(app(&fixture), Method::GET, "/coupons/c1", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "c1");
    assert_eq!(body["availableCoupons"], 5);
    assert_eq!(body["enterprise"]["enterpriseCode"], "ATONIOSFOODS");
}

#[tokio::test]
async fn test_unknown_coupon_is_not_found() {
    let fixture = Fixture::new().await;

    let (status, body) = send(app(&fixture), Method::GET, "/coupons/nope", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let fixture = Fixture::new().await;

    let (status, body) = send(
        app(&fixture),
        Method::POST,
        "/accounts/clients",
        None,
        Some(json!({
            "email": "ana@example.com",
            "username": "ana",
            "password": PASSWORD,
            "firstName": "Ana",
            "lastName": "Lopez",
            "dui": "01234567-8"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "ana@example.com");
    assert_eq!(body["profile"]["role"], "client");
    assert!(body.get("passwordHash").is_none());

    let (status, body) = send(
        app(&fixture),
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "role": "client", "email": "ana@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["access_token"].as_str().is_some());

    let (status, body) = send(
        app(&fixture),
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "role": "client", "email": "ana@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_protected_route_requires_bearer_token() {
    let fixture = Fixture::new().await;

    let (status, body) = send(app(&fixture), Method::POST, "/coupons/c1/buy", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "MISSING_CREDENTIAL");

    let (status, body) = send(
        app(&fixture),
        Method::POST,
        "/coupons/c1/buy",
        Some("garbage"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_CREDENTIAL");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let fixture = Fixture::new().await;
    let mut expired = claims("ana@example.com", Role::Client);
    expired.exp -= 7200;
    let token = fixture.token(&expired);

    let (status, body) = send(
        app(&fixture),
        Method::GET,
        "/offers/user/ana@example.com",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_wrong_role_is_forbidden() {
    let fixture = Fixture::new().await;
    let enterprise = fixture.enterprise(ENTERPRISE, "ATONIOSFOODS").await;
    fixture.coupon("c1", 5, ENTERPRISE).await;
    let token = fixture.token(&enterprise);

    let (status, body) = send(
        app(&fixture),
        Method::POST,
        "/coupons/c1/buy",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "WRONG_ROLE");
    assert_eq!(fixture.stock_of("c1").await, 5);
}

#[tokio::test]
async fn test_client_profile_visibility() {
    let fixture = Fixture::new().await;
    let ana = fixture.client("ana@example.com").await;
    let bob = fixture.client("bob@example.com").await;
    let admin = claims("root@example.com", Role::Administrator);

    let (status, body) = send(
        app(&fixture),
        Method::GET,
        "/users/ana@example.com/profile",
        Some(&fixture.token(&ana)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ana@example.com");
    assert_eq!(body["profile"]["firstName"], "Ana");
    assert!(body.get("passwordHash").is_none());

    let (status, body) = send(
        app(&fixture),
        Method::GET,
        "/users/ana@example.com/profile",
        Some(&fixture.token(&bob)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "FORBIDDEN");

    let (status, body) = send(
        app(&fixture),
        Method::GET,
        "/users/ghost@example.com/profile",
        Some(&fixture.token(&admin)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

// =============================================================================
// Purchase and redemption
// =============================================================================

#[tokio::test]
async fn test_buy_and_redeem_over_http() {
    let fixture = Fixture::new().await;
    let enterprise = fixture.enterprise(ENTERPRISE, "ATONIOSFOODS").await;
    let cashier = fixture.employee(&enterprise, "eva@atoniosfoods.com").await;
    let client = fixture.client("ana@example.com").await;
    fixture.coupon("c1", 1, ENTERPRISE).await;
    let client_token = fixture.token(&client);
    let cashier_token = fixture.token(&cashier);

    let (status, offer) = send(
        app(&fixture),
        Method::POST,
        "/coupons/c1/buy",
        Some(&client_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(offer["couponId"], "c1");
    assert_eq!(offer["redeemed"], false);
    let offer_id = offer["id"].as_str().unwrap().to_string();
    assert!(offer_id.starts_with("ATONIOSFOODS"));

    let (status, body) = send(
        app(&fixture),
        Method::POST,
        "/coupons/c1/buy",
        Some(&client_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "SOLD_OUT");

    let (status, body) = send(
        app(&fixture),
        Method::GET,
        &format!("/offers/{}", offer_id),
        Some(&client_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], offer_id.as_str());

    let redeem_uri = format!("/offers/{}/redeem", offer_id);
    let (status, body) = send(
        app(&fixture),
        Method::POST,
        &redeem_uri,
        Some(&cashier_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redeemed"], true);

    let (status, body) = send(
        app(&fixture),
        Method::POST,
        &redeem_uri,
        Some(&cashier_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "ALREADY_REDEEMED");

    let (status, body) = send(
        app(&fixture),
        Method::GET,
        "/offers/user/ana@example.com",
        Some(&client_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_with_mismatched_id_writes_nothing() {
    let fixture = Fixture::new().await;
    let enterprise = fixture.enterprise(ENTERPRISE, "ATONIOSFOODS").await;
    fixture.coupon("c1", 5, ENTERPRISE).await;
    let token = fixture.token(&enterprise);

    let (status, body) = send(
        app(&fixture),
        Method::PUT,
        "/coupons/c1",
        Some(&token),
        Some(json!({
            "id": "c2",
            "title": "Renamed",
            "regularPrice": 20.0,
            "offerPrice": 5.0,
            "validUntil": "2999-01-01T00:00:00Z",
            "availableCoupons": 99,
            "offerDesc": "Cheaper",
            "category": "food"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "ID_MISMATCH");
    assert_eq!(fixture.stock_of("c1").await, 5);

    let (status, _) = send(app(&fixture), Method::GET, "/coupons/c2", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_enterprise_publishes_coupon() {
    let fixture = Fixture::new().await;
    let enterprise = fixture.enterprise(ENTERPRISE, "ATONIOSFOODS").await;
    let token = fixture.token(&enterprise);

    let (status, body) = send(
        app(&fixture),
        Method::POST,
        "/coupons",
        Some(&token),
        Some(json!({
            "title": "Two pizzas for one",
            "regularPrice": 20.0,
            "offerPrice": 10.0,
            "validUntil": "2999-01-01T00:00:00Z",
            "availableCoupons": -1,
            "offerDesc": "Any size",
            "category": "food"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["enterpriseId"], ENTERPRISE);
    assert_eq!(body["availableCoupons"], -1);

    let (status, listed) = send(
        app(&fixture),
        Method::GET,
        "/coupons/category/food",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}
