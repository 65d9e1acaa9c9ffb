//! Router behaviour decided before any database query: the fallback,
//! extractor rejections, the authorization gate and input validation.
//!
//! Runs against a lazily-connecting pool, so no database is required.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    body_json, build_offline_app, delete_auth, get, get_auth, patch_json_auth, post_json,
    post_json_auth, put_json_auth, token_for,
};
use echoarty_core::roles::Role;
use serde_json::json;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Fallback and malformed requests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404_envelope() {
    let response = get(build_offline_app(), "/api/does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Endpoint not found");
}

#[tokio::test]
async fn health_is_200_even_without_database() {
    let response = get(build_offline_app(), "/api/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "EchoArty API is running");
    assert_eq!(json["data"]["db_healthy"], false);
}

#[tokio::test]
async fn malformed_json_returns_400_envelope() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/register")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = build_offline_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn non_numeric_path_id_returns_400() {
    let token = token_for(1, Role::Staff);
    let response = get_auth(build_offline_app(), "/api/orders/abc", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let response = get(build_offline_app(), "/api/does-not-exist").await;
    assert!(response.headers().contains_key("x-request-id"));
}

// ---------------------------------------------------------------------------
// Authorization gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_is_401() {
    let body = json!({ "name": "Poster", "price": 100 });
    let response = post_json(build_offline_app(), "/api/products", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn forged_token_is_401() {
    let response = get_auth(build_offline_app(), "/api/orders", "not-a-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn customer_cannot_manage_catalog() {
    let token = token_for(10, Role::Customer);
    let body = json!({ "name": "Poster", "price": 100 });

    let response = post_json_auth(build_offline_app(), "/api/products", body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(build_offline_app(), "/api/categories/1", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn customer_cannot_change_order_status() {
    let token = token_for(10, Role::Customer);
    let body = json!({ "status_id": 4 });

    let response = patch_json_auth(build_offline_app(), "/api/orders/1", body, &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "FORBIDDEN");
}

#[tokio::test]
async fn only_god_lists_users() {
    let token = token_for(2, Role::Staff);
    let response = get_auth(build_offline_app(), "/api/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn customer_cannot_read_another_users_account() {
    let token = token_for(10, Role::Customer);

    let response = get_auth(build_offline_app(), "/api/users/11", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json!({ "city": "Chiang Mai" });
    let response = put_json_auth(build_offline_app(), "/api/users/11/profile", body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn customer_cannot_check_out_for_someone_else() {
    let token = token_for(10, Role::Customer);
    let body = json!({
        "user_id": 11,
        "cart_items": [{ "product_id": 7, "quantity": 1, "subtotal": 100 }]
    });

    let response = post_json_auth(build_offline_app(), "/api/cart/checkout", body, &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_reports_missing_fields() {
    let body = json!({ "username": "alice", "email": "alice@x.com", "password": "password1" });

    let response = post_json(build_offline_app(), "/api/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "VALIDATION_ERROR");
    assert_eq!(
        json["message"],
        "Missing required fields: firstname, lastname, city, telephone"
    );
}

#[tokio::test]
async fn register_rejects_short_password() {
    let body = json!({
        "username": "alice", "email": "alice@x.com", "password": "12345",
        "firstname": "Alice", "lastname": "Doe", "city": "Bangkok", "telephone": "0800000000"
    });

    let response = post_json(build_offline_app(), "/api/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Password must be at least 6 characters long"
    );
}

#[tokio::test]
async fn login_requires_identifier_and_password() {
    let response = post_json(build_offline_app(), "/api/login", json!({ "username": "alice" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Email/Username and password required"
    );
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let token = token_for(10, Role::Customer);
    let body = json!({ "shipping_address": "123 Main St", "cart_items": [] });

    let response = post_json_auth(build_offline_app(), "/api/cart/checkout", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Cart is empty");
}

#[tokio::test]
async fn cart_line_with_zero_quantity_is_rejected() {
    let token = token_for(10, Role::Customer);
    let body = json!({ "cart_items": [{ "product_id": 7, "quantity": 0 }] });

    let response = post_json_auth(build_offline_app(), "/api/cart/checkout", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_status_id_is_rejected_before_lookup() {
    let token = token_for(2, Role::Staff);

    let response = patch_json_auth(
        build_offline_app(),
        "/api/orders/1",
        json!({ "status_id": 99 }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid status_id");
}

#[tokio::test]
async fn missing_status_is_rejected() {
    let token = token_for(2, Role::Staff);

    let response = patch_json_auth(build_offline_app(), "/api/orders/1", json!({}), &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Missing status_id");
}

#[tokio::test]
async fn order_list_rejects_unknown_status_filter() {
    let token = token_for(10, Role::Customer);

    let response = get_auth(build_offline_app(), "/api/orders?status_id=42", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn product_requires_name_and_non_negative_price() {
    let token = token_for(2, Role::Staff);

    let response = post_json_auth(
        build_offline_app(),
        "/api/products",
        json!({ "price": 100 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        build_offline_app(),
        "/api/products",
        json!({ "name": "Poster", "price": -1 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn amounts_beyond_column_precision_are_rejected() {
    let token = token_for(2, Role::Staff);

    let response = post_json_auth(
        build_offline_app(),
        "/api/products",
        json!({ "name": "Poster", "price": 10_000_000_000u64 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "VALIDATION_ERROR");

    let response = post_json_auth(
        build_offline_app(),
        "/api/cart/checkout",
        json!({ "cart_items": [{ "product_id": 1, "quantity": 1, "subtotal": 100_000_000_000u64 }] }),
        &token_for(7, Role::Customer),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "VALIDATION_ERROR");
    assert!(json["message"].as_str().unwrap().starts_with("Cart line 1:"));
}
