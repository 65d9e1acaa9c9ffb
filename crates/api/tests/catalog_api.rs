//! Catalog endpoints against a real database.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, post_json_auth, put_json_auth, token_for};
use echoarty_core::roles::Role;
use echoarty_db::models::product::{CreateProduct, ProductWithCategories};
use echoarty_db::repositories::{CategoryRepo, ProductRepo};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;

async fn seed_product(pool: &PgPool, name: &str, category_ids: Vec<i64>) -> ProductWithCategories {
    ProductRepo::create(
        pool,
        &CreateProduct {
            name: name.to_string(),
            description: "A print".to_string(),
            price: Decimal::from(100),
            image_url: Some(format!("/images/{name}.jpg")),
            size: None,
            category_ids,
        },
    )
    .await
    .expect("product creation")
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_creates_category_and_duplicate_conflicts(pool: PgPool) {
    let staff = common::create_user(&pool, "staff", Role::Staff).await;
    let token = token_for(staff.id, Role::Staff);
    let app = common::build_test_app(pool);

    let response =
        post_json_auth(app.clone(), "/api/categories", json!({ "name": "Anime" }), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response =
        post_json_auth(app.clone(), "/api/categories", json!({ "name": "Anime" }), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["message"], "Category already exists");

    let response = get(app, "/api/categories").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_unknown_category_is_404(pool: PgPool) {
    let token = token_for(1, Role::Staff);
    let app = common::build_test_app(pool);

    let response = delete_auth(app, "/api/categories/999999", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_product_with_ratio_and_sorted_tags(pool: PgPool) {
    let portrait = CategoryRepo::create(&pool, "Portrait").await.unwrap();
    let anime = CategoryRepo::create(&pool, "Anime").await.unwrap();
    let token = token_for(1, Role::Staff);
    let app = common::build_test_app(pool);

    let body = json!({
        "name": "Sunset",
        "description": "Oil on canvas",
        "price": 250.5,
        "number_x": 16,
        "number_y": 9,
        "category_ids": [portrait.id, anime.id]
    });
    let response = post_json_auth(app, "/api/products", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["size"], "16:9");
    assert_eq!(json["data"]["price"].as_f64(), Some(250.5));
    assert_eq!(json["data"]["categories"][0]["name"], "Anime");
    assert_eq!(json["data"]["categories"][1]["name"], "Portrait");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_category_id_is_rejected(pool: PgPool) {
    let token = token_for(1, Role::Staff);
    let app = common::build_test_app(pool.clone());

    let body = json!({ "name": "Sunset", "price": 100, "category_ids": [424242] });
    let response = post_json_auth(app, "/api/products", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Unknown category ids: 424242");
    assert!(ProductRepo::list(&pool, None).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn gallery_detail_reads_are_identical(pool: PgPool) {
    let category = CategoryRepo::create(&pool, "Landscape").await.unwrap();
    let product = seed_product(&pool, "mountain", vec![category.id]).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/gallery/detail/{}", product.product.id);

    let first = body_json(get(app.clone(), &uri).await).await;
    let second = body_json(get(app, &uri).await).await;

    assert_eq!(first["data"]["name"], "mountain");
    assert_eq!(first["data"].to_string(), second["data"].to_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn gallery_filters_by_category_and_unknown_id_is_404(pool: PgPool) {
    let anime = CategoryRepo::create(&pool, "Anime").await.unwrap();
    seed_product(&pool, "tagged", vec![anime.id]).await;
    seed_product(&pool, "untagged", vec![]).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app.clone(), "/api/gallery").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let uri = format!("/api/gallery?category_id={}", anime.id);
    let json = body_json(get(app.clone(), &uri).await).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "tagged");

    let response = get(app, "/api/gallery/detail/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_update_keeps_other_fields(pool: PgPool) {
    let anime = CategoryRepo::create(&pool, "Anime").await.unwrap();
    let product = seed_product(&pool, "poster", vec![anime.id]).await;
    let token = token_for(1, Role::Staff);
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        &format!("/api/products/{}", product.product.id),
        json!({ "price": 120, "category_ids": [] }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "poster");
    assert_eq!(json["data"]["price"].as_f64(), Some(120.0));
    assert_eq!(json["data"]["size"], "1:1");
    assert!(json["data"]["categories"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn product_with_orders_cannot_be_deleted(pool: PgPool) {
    let buyer = common::create_user(&pool, "buyer", Role::Customer).await;
    let product = seed_product(&pool, "popular", vec![]).await;
    let app = common::build_test_app(pool);

    let order = json!({ "product_id": product.product.id, "quantity": 1 });
    let response = post_json_auth(
        app.clone(),
        "/api/orders",
        order,
        &token_for(buyer.id, Role::Customer),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = delete_auth(
        app,
        &format!("/api/products/{}", product.product.id),
        &token_for(1, Role::Staff),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
