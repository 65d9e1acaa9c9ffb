//! Pure checkout rules: cart-line checks, order descriptions, shipping
//! address resolution and total handling.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::CoreError;
use crate::types::{DbId, Money};

/// Stored when neither a profile nor the caller provides an address.
pub const NO_SHIPPING_ADDRESS: &str = "No shipping address provided";

/// Separator between the parts of a synthesized order description.
pub const DESCRIPTION_SEPARATOR: &str = " | ";

/// One line of a cart submitted for checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    pub product_id: DbId,
    pub quantity: i32,
    /// Line total as computed by the client. Trusted as-is.
    #[serde(default, alias = "total_amount")]
    pub subtotal: Option<Money>,
    /// Custom aspect ratio or print size, e.g. `"30x40"`.
    #[serde(default)]
    pub custom_size: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CartLine {
    pub fn validate(&self, index: usize) -> Result<(), CoreError> {
        validate_quantity(self.quantity)
            .map_err(|e| CoreError::Validation(format!("Cart line {}: {e}", index + 1)))?;
        if let Some(subtotal) = self.subtotal {
            validate_amount(subtotal)
                .map_err(|e| CoreError::Validation(format!("Cart line {}: {e}", index + 1)))?;
        }
        Ok(())
    }

    /// The stored total: the client's subtotal, or `price * quantity` when
    /// the line carries none.
    pub fn total_for(&self, unit_price: Money) -> Money {
        self.subtotal
            .unwrap_or_else(|| expected_total(unit_price, self.quantity))
    }
}

pub fn validate_quantity(quantity: i32) -> Result<(), String> {
    if quantity < 1 {
        return Err(format!("quantity must be at least 1 (got {quantity})"));
    }
    Ok(())
}

/// Largest amount a `NUMERIC(12, 2)` column holds.
pub const MAX_AMOUNT: Money = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

pub fn validate_amount(amount: Money) -> Result<(), String> {
    if amount < Decimal::ZERO {
        return Err(format!("amount must not be negative (got {amount})"));
    }
    if amount.round_dp(2) > MAX_AMOUNT {
        return Err(format!("amount must not exceed {MAX_AMOUNT} (got {amount})"));
    }
    Ok(())
}

/// Server-side reference total for a line.
pub fn expected_total(unit_price: Money, quantity: i32) -> Money {
    unit_price * Decimal::from(quantity)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Build `Quantity: q | Size: s | Note: n`, leaving out absent parts.
pub fn compose_description(quantity: i32, custom_size: Option<&str>, notes: Option<&str>) -> String {
    let mut parts = vec![format!("Quantity: {quantity}")];
    if let Some(size) = non_blank(custom_size) {
        parts.push(format!("Size: {size}"));
    }
    if let Some(note) = non_blank(notes) {
        parts.push(format!("Note: {note}"));
    }
    parts.join(DESCRIPTION_SEPARATOR)
}

/// Address fields of a stored profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileAddress<'a> {
    pub street_address: &'a str,
    pub city: &'a str,
    pub postal_code: &'a str,
}

impl ProfileAddress<'_> {
    /// `street, city, postal`, skipping empty parts. `None` if all are empty.
    pub fn formatted(&self) -> Option<String> {
        let parts: Vec<&str> = [self.street_address, self.city, self.postal_code]
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Checkout rule: the buyer's profile wins over the supplied address.
pub fn checkout_shipping_address(profile: Option<ProfileAddress<'_>>, supplied: Option<&str>) -> String {
    profile
        .and_then(|p| p.formatted())
        .or_else(|| non_blank(supplied).map(str::to_string))
        .unwrap_or_else(|| NO_SHIPPING_ADDRESS.to_string())
}

/// Single-order rule: an explicitly supplied address wins over the profile.
pub fn direct_order_shipping_address(
    profile: Option<ProfileAddress<'_>>,
    supplied: Option<&str>,
) -> String {
    non_blank(supplied)
        .map(str::to_string)
        .or_else(|| profile.and_then(|p| p.formatted()))
        .unwrap_or_else(|| NO_SHIPPING_ADDRESS.to_string())
}
