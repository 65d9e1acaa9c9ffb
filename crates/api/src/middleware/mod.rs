//! Request context and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the verified identity from a Bearer token.
//! - [`rbac::RequireGod`], [`rbac::RequireStaff`], [`rbac::RequireCustomer`] --
//!   pass the identity through the authorization gate with a minimum role.

pub mod auth;
pub mod rbac;
