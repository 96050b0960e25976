//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization. Monetary values are rounded to 2 decimal
//! places.

use crate::orders::traits::OrderError;
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::*;
use shared::order::{OrderItemSnapshot, SupplierPayout};
use std::collections::BTreeMap;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed unit price
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
const MAX_QUANTITY: i32 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field_name: &str) -> Result<(), OrderError> {
    if !value.is_finite() {
        return Err(OrderError::InvalidOperation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate a unit price before it enters the system
pub fn validate_price(price: f64) -> Result<(), OrderError> {
    require_finite(price, "price")?;
    if price < 0.0 {
        return Err(OrderError::InvalidOperation(format!(
            "price must be non-negative, got {}",
            price
        )));
    }
    if price > MAX_PRICE {
        return Err(OrderError::InvalidOperation(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, price
        )));
    }
    Ok(())
}

/// Validate an order item quantity
pub fn validate_quantity(quantity: i32) -> Result<(), OrderError> {
    if quantity <= 0 {
        return Err(OrderError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY {
        return Err(OrderError::InvalidOperation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// Validate a wallet debit/credit amount
pub fn validate_amount(amount: f64) -> Result<(), OrderError> {
    require_finite(amount, "amount")?;
    if amount <= 0.0 {
        return Err(OrderError::InvalidAmount);
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Round a Decimal to 2 places, half-up
#[inline]
fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round2(value).to_f64().unwrap_or(0.0)
}

/// Round a monetary f64 to 2 decimal places
#[inline]
pub fn round_money(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// Compute a line total: unit price × quantity
pub fn line_total(unit_price: f64, quantity: i32) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Compute order totals: (total amount, total quantity)
///
/// Always recomputed from the line items so the two can never drift.
pub fn order_totals(items: &[OrderItemSnapshot]) -> (f64, i32) {
    let mut total = Decimal::ZERO;
    let mut quantity = 0;
    for item in items {
        total += to_decimal(item.line_total);
        quantity += item.quantity;
    }
    (to_f64(total), quantity)
}

/// Check whether an available balance covers a required amount,
/// with a small tolerance for rounding dust
pub fn is_sufficient(available: f64, required: f64) -> bool {
    to_decimal(available) + MONEY_TOLERANCE >= to_decimal(required)
}

/// Split an order's item totals into per-supplier payouts minus commission
///
/// Each supplier receives its item line totals × (1 − commission_rate),
/// rounded per supplier. The commission is the remainder
/// (total − Σ payouts), so the split always balances to the order total.
pub fn payout_split(
    items: &[OrderItemSnapshot],
    commission_rate: f64,
) -> (Vec<SupplierPayout>, f64) {
    let rate = to_decimal(commission_rate);

    let mut per_supplier: BTreeMap<u64, Decimal> = BTreeMap::new();
    for item in items {
        *per_supplier.entry(item.supplier_id).or_insert(Decimal::ZERO) +=
            to_decimal(item.line_total);
    }

    let mut total = Decimal::ZERO;
    let mut paid = Decimal::ZERO;
    let mut payouts = Vec::with_capacity(per_supplier.len());
    for (supplier_id, sum) in per_supplier {
        total += sum;
        let amount = round2(sum * (Decimal::ONE - rate));
        paid += amount;
        payouts.push(SupplierPayout {
            supplier_id,
            amount: to_f64(amount),
        });
    }

    (payouts, to_f64(total - paid))
}
