//! Domain rules for the EchoArty shop: roles and the authorization gate,
//! the order status vocabulary, checkout and registration rules.
//!
//! Nothing in this crate performs I/O.

pub mod checkout;
pub mod error;
pub mod identity;
pub mod orders;
pub mod roles;
pub mod status;
pub mod types;
