//! Order status vocabulary and lifecycle rules.
//!
//! Discriminants match the seed rows of the `order_statuses` table (1-based).
//!
//! ```text
//! pending(1) -> awaiting_packing(2) -> packing(3) -> delivered(4)
//!      \______________\_______________\___________> cancelled(5)
//! ```
//!
//! `delivered` and `cancelled` are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending = 1,
    AwaitingPacking = 2,
    Packing = 3,
    Delivered = 4,
    Cancelled = 5,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::AwaitingPacking,
        OrderStatus::Packing,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| i64::from(s.id()) == id)
    }

    /// Canonical name, as seeded in `order_statuses.name`.
    pub fn name(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::AwaitingPacking => "awaiting_packing",
            OrderStatus::Packing => "packing",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a canonical name or one of the labels used by the packing screen
    /// (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        let status = match normalized.as_str() {
            "pending" => OrderStatus::Pending,
            "awaiting_packing" | "waiting_for_packing" | "processing" => {
                OrderStatus::AwaitingPacking
            }
            "packing" => OrderStatus::Packing,
            "delivered" | "delivery" | "success" | "complete" => OrderStatus::Delivered,
            "cancelled" | "canceled" | "failed" => OrderStatus::Cancelled,
            _ => return None,
        };
        Some(status)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// The next step on the happy path, if any.
    pub fn successor(self) -> Option<Self> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::AwaitingPacking),
            OrderStatus::AwaitingPacking => Some(OrderStatus::Packing),
            OrderStatus::Packing => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }
}

impl From<OrderStatus> for StatusId {
    fn from(value: OrderStatus) -> Self {
        value as StatusId
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How strictly status changes are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any status in the vocabulary may follow any other.
    #[default]
    Permissive,
    /// Only the happy-path successor, or cancellation of a non-terminal order.
    Strict,
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(TransitionPolicy::Permissive),
            "strict" => Ok(TransitionPolicy::Strict),
            other => Err(format!(
                "unknown transition policy '{other}' (expected 'permissive' or 'strict')"
            )),
        }
    }
}

/// Check a status change against `policy`.
///
/// Re-applying the current status is always accepted.
pub fn check_transition(
    from: OrderStatus,
    to: OrderStatus,
    policy: TransitionPolicy,
) -> Result<(), CoreError> {
    if from == to || policy == TransitionPolicy::Permissive {
        return Ok(());
    }
    if from.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "Order is already {from} and cannot change status"
        )));
    }
    if to == OrderStatus::Cancelled || from.successor() == Some(to) {
        return Ok(());
    }
    Err(CoreError::Conflict(format!(
        "Cannot move an order from {from} to {to}"
    )))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn status_ids_match_seed_data() {
        assert_eq!(OrderStatus::Pending.id(), 1);
        assert_eq!(OrderStatus::AwaitingPacking.id(), 2);
        assert_eq!(OrderStatus::Packing.id(), 3);
        assert_eq!(OrderStatus::Delivered.id(), 4);
        assert_eq!(OrderStatus::Cancelled.id(), 5);
        let id: StatusId = OrderStatus::Packing.into();
        assert_eq!(id, 3);
    }

    #[test]
    fn from_id_rejects_unknown() {
        assert_eq!(OrderStatus::from_id(1), Some(OrderStatus::Pending));
        assert_eq!(OrderStatus::from_id(5), Some(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::from_id(0), None);
        assert_eq!(OrderStatus::from_id(6), None);
        assert_eq!(OrderStatus::from_id(99), None);
    }

    #[test]
    fn from_name_accepts_packing_screen_labels() {
        assert_eq!(
            OrderStatus::from_name("Waiting for packing"),
            Some(OrderStatus::AwaitingPacking)
        );
        assert_eq!(OrderStatus::from_name("Processing"), Some(OrderStatus::AwaitingPacking));
        assert_eq!(OrderStatus::from_name("Success"), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::from_name("Delivery"), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::from_name("Failed"), Some(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::from_name("awaiting_packing"), Some(OrderStatus::AwaitingPacking));
        assert_eq!(OrderStatus::from_name("shipped"), None);
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::from_name(status.name()), Some(status));
        }
    }

    #[test]
    fn terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Packing.is_terminal());
    }

    #[test]
    fn permissive_allows_skipping_and_reopening() {
        let p = TransitionPolicy::Permissive;
        assert!(check_transition(OrderStatus::Pending, OrderStatus::Delivered, p).is_ok());
        assert!(check_transition(OrderStatus::Cancelled, OrderStatus::Pending, p).is_ok());
    }

    #[test]
    fn strict_follows_happy_path_and_cancellation() {
        let s = TransitionPolicy::Strict;
        assert!(check_transition(OrderStatus::Pending, OrderStatus::AwaitingPacking, s).is_ok());
        assert!(check_transition(OrderStatus::Packing, OrderStatus::Delivered, s).is_ok());
        assert!(check_transition(OrderStatus::Packing, OrderStatus::Cancelled, s).is_ok());
        assert!(check_transition(OrderStatus::Packing, OrderStatus::Packing, s).is_ok());
        assert_matches!(
            check_transition(OrderStatus::Pending, OrderStatus::Delivered, s),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            check_transition(OrderStatus::Delivered, OrderStatus::Cancelled, s),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("strict".parse::<TransitionPolicy>(), Ok(TransitionPolicy::Strict));
        assert_eq!(" Permissive ".parse::<TransitionPolicy>(), Ok(TransitionPolicy::Permissive));
        assert!("lenient".parse::<TransitionPolicy>().is_err());
    }
}
