//! Order listing scope.
//!
//! Customers only ever see their own orders. Staff and above may filter by
//! any user and status. A caller may ask to be treated as a lower role (the
//! storefront passes `role_id=3`), never a higher one.

use crate::roles::{RequestContext, Role};
use crate::status::OrderStatus;
use crate::types::DbId;

/// Filters as requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderListRequest {
    pub user_id: Option<DbId>,
    pub status: Option<OrderStatus>,
    pub as_role: Option<Role>,
}

/// Filters actually applied to the ledger query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub user_id: Option<DbId>,
    pub status: Option<OrderStatus>,
}

/// Resolve the effective filter for `caller`.
pub fn scope_order_list(caller: &RequestContext, request: OrderListRequest) -> OrderFilter {
    let effective = match request.as_role {
        Some(requested) => caller.role.least(requested),
        None => caller.role,
    };

    let user_id = if effective.satisfies(Role::Staff) {
        request.user_id
    } else {
        Some(caller.user_id)
    };

    OrderFilter {
        user_id,
        status: request.status,
    }
}
