//! Handlers for categories, products and the public gallery.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use echoarty_core::checkout::validate_amount;
use echoarty_core::error::CoreError;
use echoarty_core::types::{DbId, Money};
use echoarty_db::models::category::{Category, CreateCategory};
use echoarty_db::models::product::{CreateProduct, ProductWithCategories, UpdateProduct};
use echoarty_db::repositories::{CategoryRepo, ProductRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::rbac::RequireStaff;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub category_id: Option<DbId>,
}

/// Request body for `POST /api/products`.
///
/// The aspect ratio comes either as `size` (`"3:4"`) or as the two numbers
/// `number_x` and `number_y`.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub price: Option<Money>,
    pub image_url: Option<String>,
    pub size: Option<String>,
    pub number_x: Option<u32>,
    pub number_y: Option<u32>,
    #[serde(default)]
    pub category_ids: Vec<DbId>,
}

/// Request body for `PUT /api/products/{id}`. Omitted fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub image_url: Option<String>,
    pub size: Option<String>,
    pub number_x: Option<u32>,
    pub number_y: Option<u32>,
    pub category_ids: Option<Vec<DbId>>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `size` wins; otherwise both numbers form `"x:y"`.
fn resolve_size(
    size: Option<&str>,
    number_x: Option<u32>,
    number_y: Option<u32>,
) -> Result<Option<String>, CoreError> {
    if let Some(size) = size.map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(Some(size.to_string()));
    }
    match (number_x, number_y) {
        (None, None) => Ok(None),
        (Some(x), Some(y)) if x > 0 && y > 0 => Ok(Some(format!("{x}:{y}"))),
        _ => Err(CoreError::Validation(
            "number_x and number_y must both be positive".into(),
        )),
    }
}

fn validate_price(price: Money) -> Result<(), CoreError> {
    validate_amount(price).map_err(|e| CoreError::Validation(format!("price: {e}")))
}

async fn ensure_categories_exist(state: &AppState, ids: &[DbId]) -> AppResult<()> {
    let missing = CategoryRepo::find_missing(&state.pool, ids).await?;
    if missing.is_empty() {
        return Ok(());
    }
    let list: Vec<String> = missing.iter().map(ToString::to_string).collect();
    Err(CoreError::Validation(format!("Unknown category ids: {}", list.join(", "))).into())
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok(categories)))
}

/// POST /api/categories
pub async fn create_category(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Category name is required".into()).into());
    }

    let category = CategoryRepo::create(&state.pool, name).await?;
    tracing::info!(category_id = category.id, user_id = user.user_id, "Category created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Category created", category)),
    ))
}

/// DELETE /api/categories/{id}
pub async fn delete_category(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "Category", id }.into());
    }
    tracing::info!(category_id = id, user_id = user.user_id, "Category deleted");
    Ok(Json(ApiResponse::message("Category deleted")))
}

// ---------------------------------------------------------------------------
// Products and gallery
// ---------------------------------------------------------------------------

/// GET /api/products and GET /api/gallery
pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductListQuery>,
) -> AppResult<Json<ApiResponse<Vec<ProductWithCategories>>>> {
    let products = ProductRepo::list(&state.pool, query.category_id).await?;
    Ok(Json(ApiResponse::ok(products)))
}

/// GET /api/products/{id} and GET /api/gallery/detail/{id}
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<ProductWithCategories>>> {
    let product = ProductRepo::find_with_categories(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Product", id })?;
    Ok(Json(ApiResponse::ok(product)))
}

/// POST /api/products
pub async fn create_product(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductWithCategories>>)> {
    let name = input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| CoreError::Validation("Product name is required".into()))?;
    let price = input
        .price
        .ok_or_else(|| CoreError::Validation("Product price is required".into()))?;
    validate_price(price)?;
    let size = resolve_size(input.size.as_deref(), input.number_x, input.number_y)?;
    ensure_categories_exist(&state, &input.category_ids).await?;

    let create = CreateProduct {
        name: name.to_string(),
        description: input.description.trim().to_string(),
        price,
        image_url: input.image_url,
        size,
        category_ids: input.category_ids,
    };
    let product = ProductRepo::create(&state.pool, &create).await?;
    tracing::info!(product_id = product.product.id, user_id = user.user_id, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Product created", product)),
    ))
}

/// PUT /api/products/{id}
pub async fn update_product(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<ProductWithCategories>>> {
    if let Some(price) = input.price {
        validate_price(price)?;
    }
    if let Some(name) = input.name.as_deref() {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("Product name must not be blank".into()).into());
        }
    }
    let size = resolve_size(input.size.as_deref(), input.number_x, input.number_y)?;
    if let Some(ids) = input.category_ids.as_deref() {
        ensure_categories_exist(&state, ids).await?;
    }

    let update = UpdateProduct {
        name: input.name.map(|n| n.trim().to_string()),
        description: input.description,
        price: input.price,
        image_url: input.image_url,
        size,
        category_ids: input.category_ids,
    };
    let product = ProductRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(CoreError::NotFound { entity: "Product", id })?;
    tracing::info!(product_id = id, user_id = user.user_id, "Product updated");

    Ok(Json(ApiResponse::with_message("Product updated", product)))
}

/// DELETE /api/products/{id}
///
/// Products referenced by orders cannot be deleted (409).
pub async fn delete_product(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !ProductRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "Product", id }.into());
    }
    tracing::info!(product_id = id, user_id = user.user_id, "Product deleted");
    Ok(Json(ApiResponse::message("Product deleted")))
}
