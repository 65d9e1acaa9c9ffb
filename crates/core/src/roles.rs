//! Role vocabulary and the authorization gate.
//!
//! Roles form a total order of privilege: `god` > `staff` > `customer`. A
//! caller passes every gate whose minimum role is at or below its own. The
//! numeric ids must match the seed data in `db/migrations/20260101000001_create_identity_tables.sql`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

pub const ROLE_GOD: &str = "god";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_CUSTOMER: &str = "customer";

/// A user's single role assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    God = 1,
    Staff = 2,
    Customer = 3,
}

impl Role {
    /// Every role, most privileged first.
    pub const ALL: [Role; 3] = [Role::God, Role::Staff, Role::Customer];

    /// Return the database role ID.
    pub fn id(self) -> DbId {
        self as DbId
    }

    pub fn from_id(id: DbId) -> Option<Self> {
        match id {
            1 => Some(Role::God),
            2 => Some(Role::Staff),
            3 => Some(Role::Customer),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::God => ROLE_GOD,
            Role::Staff => ROLE_STAFF,
            Role::Customer => ROLE_CUSTOMER,
        }
    }

    /// Higher is more privileged.
    fn rank(self) -> u8 {
        match self {
            Role::God => 3,
            Role::Staff => 2,
            Role::Customer => 1,
        }
    }

    /// True when this role may perform anything `required` may perform.
    pub fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// The less privileged of two roles.
    pub fn least(self, other: Role) -> Role {
        if self.rank() <= other.rank() {
            self
        } else {
            other
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The verified identity attached to a request.
///
/// Produced by the API layer after token verification and passed explicitly
/// into the gate and handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: DbId,
    pub role: Role,
}

impl RequestContext {
    /// True when the caller is `user_id` or holds at least `staff`.
    pub fn can_act_for(&self, user_id: DbId) -> bool {
        self.user_id == user_id || self.role.satisfies(Role::Staff)
    }
}

/// Why the gate refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    /// No session was presented.
    #[error("Authentication required")]
    NotAuthenticated,

    /// A session was presented but its role is below the threshold.
    #[error("{required} role or above required")]
    InsufficientPrivilege { required: Role, actual: Role },
}

/// Decide whether `session` may invoke an operation gated at `required`.
pub fn authorize(session: Option<&RequestContext>, required: Role) -> Result<(), AccessDenied> {
    let session = session.ok_or(AccessDenied::NotAuthenticated)?;
    if session.role.satisfies(required) {
        Ok(())
    } else {
        Err(AccessDenied::InsufficientPrivilege {
            required,
            actual: session.role,
        })
    }
}
