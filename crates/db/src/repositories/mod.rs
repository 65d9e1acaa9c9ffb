//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod checkout_repo;
pub mod order_repo;
pub mod product_repo;
pub mod profile_repo;
pub mod role_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use checkout_repo::{CheckoutRepo, NewCheckout};
pub use order_repo::{OrderRepo, OrderStatusRepo};
pub use product_repo::ProductRepo;
pub use profile_repo::ProfileRepo;
pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;
