//! Handlers for the order ledger: listing, tracking, single orders, status
//! changes and cart checkout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use echoarty_core::checkout::{
    checkout_shipping_address, compose_description, direct_order_shipping_address,
    expected_total, validate_amount, validate_quantity, CartLine, ProfileAddress,
};
use echoarty_core::error::CoreError;
use echoarty_core::orders::{scope_order_list, OrderListRequest};
use echoarty_core::roles::{RequestContext, Role};
use echoarty_core::status::{check_transition, OrderStatus};
use echoarty_core::types::{DbId, Money};
use echoarty_db::models::order::{CreateOrder, Order, OrderDetail, OrderStatusRow};
use echoarty_db::models::user::UserProfile;
use echoarty_db::repositories::{
    CheckoutRepo, NewCheckout, OrderRepo, OrderStatusRepo, ProductRepo, ProfileRepo, UserRepo,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::rbac::{RequireCustomer, RequireStaff};
use crate::response::ApiResponse;
use crate::state::AppState;

const INVALID_STATUS_ID: &str = "Invalid status_id";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string for `GET /api/orders`.
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub user_id: Option<DbId>,
    pub status_id: Option<i64>,
    /// Act as this role. Only ever lowers the caller's privilege.
    pub role_id: Option<DbId>,
}

/// Request body for `POST /api/orders`.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Buyer; defaults to the caller.
    pub user_id: Option<DbId>,
    pub product_id: Option<DbId>,
    pub quantity: Option<i32>,
    /// Defaults to `price * quantity` when omitted.
    pub total_amount: Option<Money>,
    pub shipping_address: Option<String>,
    pub description: Option<String>,
    pub bill_image: Option<String>,
    pub status_id: Option<i64>,
}

/// Request body for `PATCH /api/orders/{id}`: a numeric `status_id` or a
/// status `status` name. `status_id` wins when both are sent.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status_id: Option<i64>,
    pub status: Option<String>,
}

/// Request body for `POST /api/cart/checkout`.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Buyer; defaults to the caller.
    pub user_id: Option<DbId>,
    pub shipping_address: Option<String>,
    pub bill_image: Option<String>,
    #[serde(default, alias = "items")]
    pub cart_items: Vec<CartLine>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub orders: Vec<Order>,
    pub total_orders: usize,
    pub skipped_product_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_status_id(id: i64) -> Result<OrderStatus, CoreError> {
    OrderStatus::from_id(id).ok_or_else(|| CoreError::Validation(INVALID_STATUS_ID.into()))
}

/// The buyer an order is placed for. Customers may only buy for themselves.
fn resolve_buyer(caller: &RequestContext, requested: Option<DbId>) -> Result<DbId, CoreError> {
    let buyer = requested.unwrap_or(caller.user_id);
    if caller.can_act_for(buyer) {
        Ok(buyer)
    } else {
        Err(CoreError::Forbidden(
            "Customers can only place orders for themselves".into(),
        ))
    }
}

fn profile_address(profile: &Option<UserProfile>) -> Option<ProfileAddress<'_>> {
    profile.as_ref().map(|p| ProfileAddress {
        street_address: &p.street_address,
        city: &p.city,
        postal_code: &p.postal_code,
    })
}

/// Move an order to `target`, applying the configured transition policy.
///
/// Every status change goes through here.
async fn set_order_status(state: &AppState, order_id: DbId, target: OrderStatus) -> AppResult<Order> {
    let order = OrderRepo::find_by_id(&state.pool, order_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Order",
            id: order_id,
        })?;

    let current = OrderStatus::from_id(i64::from(order.status_id)).ok_or_else(|| {
        AppError::InternalError(format!(
            "Order {order_id} has unknown status id {}",
            order.status_id
        ))
    })?;
    check_transition(current, target, state.config.transition_policy)?;

    let updated = OrderRepo::set_status(&state.pool, order_id, target)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Order",
            id: order_id,
        })?;

    tracing::info!(order_id, from = %current, to = %target, "Order status changed");
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/orders?user_id&status_id&role_id
///
/// Customers always get their own orders only, whatever the filters say.
pub async fn list_orders(
    RequireCustomer(user): RequireCustomer,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<OrderListQuery>,
) -> AppResult<Json<ApiResponse<Vec<OrderDetail>>>> {
    let status = query.status_id.map(parse_status_id).transpose()?;
    let as_role = query
        .role_id
        .map(|id| Role::from_id(id).ok_or_else(|| CoreError::Validation("Invalid role_id".into())))
        .transpose()?;

    let filter = scope_order_list(
        &user.context(),
        OrderListRequest {
            user_id: query.user_id,
            status,
            as_role,
        },
    );
    let orders = OrderRepo::list(&state.pool, &filter).await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// GET /api/orders/{id}
pub async fn get_order(
    RequireCustomer(user): RequireCustomer,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let order = OrderRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Order", id })?;

    if !user.context().can_act_for(order.user_id) {
        return Err(CoreError::Forbidden("You can only view your own orders".into()).into());
    }
    Ok(Json(ApiResponse::ok(order)))
}

/// POST /api/orders
pub async fn create_order(
    RequireCustomer(user): RequireCustomer,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let (Some(product_id), Some(quantity)) = (input.product_id, input.quantity) else {
        let missing: Vec<&str> = [
            ("product_id", input.product_id.is_none()),
            ("quantity", input.quantity.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();
        return Err(CoreError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        ))
        .into());
    };

    let buyer = resolve_buyer(&user.context(), input.user_id)?;
    validate_quantity(quantity).map_err(CoreError::Validation)?;
    if let Some(total) = input.total_amount {
        validate_amount(total).map_err(CoreError::Validation)?;
    }
    let status = match input.status_id {
        Some(id) => parse_status_id(id)?,
        None => OrderStatus::Pending,
    };

    UserRepo::find_by_id(&state.pool, buyer)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: buyer,
        })?;
    let product = ProductRepo::find_by_id(&state.pool, product_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id: product_id,
        })?;
    let profile = ProfileRepo::find_by_user(&state.pool, buyer).await?;

    let total_amount = input
        .total_amount
        .unwrap_or_else(|| expected_total(product.price, quantity));
    validate_amount(total_amount).map_err(CoreError::Validation)?;

    let create = CreateOrder {
        user_id: buyer,
        product_id,
        quantity,
        total_amount,
        shipping_address: direct_order_shipping_address(
            profile_address(&profile),
            input.shipping_address.as_deref(),
        ),
        description: input
            .description
            .filter(|d| !d.trim().is_empty())
            .or_else(|| Some(compose_description(quantity, None, None))),
        bill_image: input.bill_image,
        status_id: status.id(),
    };
    let order = OrderRepo::create(&state.pool, &create).await?;
    tracing::info!(order_id = order.id, user_id = buyer, product_id, "Order created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Order created successfully", order)),
    ))
}

/// PATCH /api/orders/{id}
pub async fn update_order_status(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let target = match (input.status_id, input.status.as_deref()) {
        (Some(status_id), _) => parse_status_id(status_id)?,
        (None, Some(name)) => OrderStatus::from_name(name)
            .ok_or_else(|| CoreError::Validation(INVALID_STATUS_ID.into()))?,
        (None, None) => {
            return Err(CoreError::Validation("Missing status_id".into()).into());
        }
    };

    let order = set_order_status(&state, id, target).await?;
    tracing::debug!(order_id = id, user_id = user.user_id, "Status change requested by staff");

    Ok(Json(ApiResponse::with_message(
        "Order status updated successfully",
        order,
    )))
}

/// POST /api/cart/checkout
///
/// One pending order per cart line. Lines whose product no longer exists are
/// skipped and reported; the rest commit together or not at all.
pub async fn checkout(
    RequireCustomer(user): RequireCustomer,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CheckoutResponse>>)> {
    if input.cart_items.is_empty() {
        return Err(CoreError::Validation("Cart is empty".into()).into());
    }
    let buyer = resolve_buyer(&user.context(), input.user_id)?;
    for (index, line) in input.cart_items.iter().enumerate() {
        line.validate(index)?;
    }

    UserRepo::find_by_id(&state.pool, buyer)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: buyer,
        })?;
    let profile = ProfileRepo::find_by_user(&state.pool, buyer).await?;
    let shipping_address =
        checkout_shipping_address(profile_address(&profile), input.shipping_address.as_deref());

    let outcome = CheckoutRepo::checkout(
        &state.pool,
        &NewCheckout {
            user_id: buyer,
            shipping_address,
            bill_image: input.bill_image,
            lines: input.cart_items,
        },
    )
    .await?;

    let data = CheckoutResponse {
        total_orders: outcome.orders.len(),
        orders: outcome.orders,
        skipped_product_ids: outcome.skipped_product_ids,
    };
    let message = format!("Checkout completed: {} order(s) created", data.total_orders);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(message, data)),
    ))
}

/// GET /api/order-statuses
pub async fn list_order_statuses(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<OrderStatusRow>>>> {
    let statuses = OrderStatusRepo::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok(statuses)))
}
