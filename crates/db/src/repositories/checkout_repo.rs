//! Batch checkout: one order row per resolvable cart line, all in one
//! transaction.

use echoarty_core::checkout::{compose_description, expected_total, CartLine};
use echoarty_core::status::OrderStatus;
use echoarty_core::types::{DbId, Money};
use sqlx::PgPool;

use crate::models::order::{CheckoutOutcome, Order};
use crate::repositories::order_repo::{COLUMNS, INSERT};

/// A validated checkout request. The shipping address is already resolved.
#[derive(Debug, Clone)]
pub struct NewCheckout {
    pub user_id: DbId,
    pub shipping_address: String,
    pub bill_image: Option<String>,
    pub lines: Vec<CartLine>,
}

pub struct CheckoutRepo;

impl CheckoutRepo {
    /// Persist the cart.
    ///
    /// Lines whose product no longer exists are skipped and reported in
    /// [`CheckoutOutcome::skipped_product_ids`]. Any insert failure rolls
    /// back every order of the call.
    pub async fn checkout(pool: &PgPool, input: &NewCheckout) -> Result<CheckoutOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut outcome = CheckoutOutcome::default();

        let insert = format!("{INSERT} RETURNING {COLUMNS}");

        for line in &input.lines {
            // FOR SHARE keeps the product from being deleted until commit.
            let price = sqlx::query_scalar::<_, Money>(
                "SELECT price FROM products WHERE id = $1 FOR SHARE",
            )
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(price) = price else {
                tracing::warn!(
                    user_id = input.user_id,
                    product_id = line.product_id,
                    "Skipping cart line for missing product"
                );
                outcome.skipped_product_ids.push(line.product_id);
                continue;
            };

            let total = line.total_for(price);
            let reference = expected_total(price, line.quantity);
            if total != reference {
                tracing::warn!(
                    user_id = input.user_id,
                    product_id = line.product_id,
                    client_total = %total,
                    expected_total = %reference,
                    "Client-supplied total differs from price * quantity"
                );
            }

            let description =
                compose_description(line.quantity, line.custom_size.as_deref(), line.notes.as_deref());

            let order = sqlx::query_as::<_, Order>(&insert)
                .bind(input.user_id)
                .bind(line.product_id)
                .bind(line.quantity)
                .bind(total)
                .bind(&input.shipping_address)
                .bind(description)
                .bind(&input.bill_image)
                .bind(OrderStatus::Pending.id())
                .fetch_one(&mut *tx)
                .await?;
            outcome.orders.push(order);
        }

        tx.commit().await?;

        tracing::info!(
            user_id = input.user_id,
            created = outcome.orders.len(),
            skipped = outcome.skipped_product_ids.len(),
            "Checkout committed"
        );
        Ok(outcome)
    }
}
