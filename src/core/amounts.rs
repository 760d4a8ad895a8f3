//! Tax arithmetic engine — pure functions over line-item collections.
//!
//! Monetary outputs are rounded to two decimals only at the point they enter
//! a document field ([`round2`]); intermediates stay unrounded so rounding
//! error does not compound across aggregations.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::types::CartItem;

/// IVA rate embedded in tax-inclusive prices (13%, fixed by law).
pub const IVA_RATE: Decimal = dec!(0.13);

/// Divisor extracting the net portion from a tax-inclusive amount.
pub const IVA_DIVISOR: Decimal = dec!(1.13);

/// Round to exactly two decimal places, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum of `quantity × price` across items.
pub fn total(items: &[CartItem]) -> Decimal {
    items.iter().map(|item| item.quantity * item.price).sum()
}

/// Sum of `quantity × effective_price`, where the effective price is the
/// greater of the sale price and the catalog floor price. Guards against a
/// price that was already discounted below the floor.
pub fn total_without_discount(items: &[CartItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.quantity * item.price.max(item.base_price))
        .sum()
}

/// Sum of `discount_amount × quantity` across items.
pub fn discount_total(items: &[CartItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.discount_amount * item.quantity)
        .sum()
}

/// IVA portion of a single tax-inclusive amount: `amount − amount / 1.13`.
pub fn iva_portion(amount: Decimal) -> Decimal {
    amount - amount / IVA_DIVISOR
}

/// Treat each item's `price × quantity` as tax-inclusive and sum the
/// extracted IVA portions.
pub fn tax_extracted(items: &[CartItem]) -> Decimal {
    items
        .iter()
        .map(|item| iva_portion(item.quantity * item.price))
        .sum()
}

/// Sum of the pre-classified taxed amounts.
pub fn taxed_total(items: &[CartItem]) -> Decimal {
    items.iter().map(|item| item.taxed_total).sum()
}

/// Sum of the pre-classified exempt amounts.
pub fn exempt_total(items: &[CartItem]) -> Decimal {
    items.iter().map(|item| item.exempt_total).sum()
}

/// Sum of the pre-classified non-subject amounts.
pub fn non_subject_total(items: &[CartItem]) -> Decimal {
    items.iter().map(|item| item.non_subject_total).sum()
}

/// Sum of the non-taxed amounts.
pub fn non_taxed_total(items: &[CartItem]) -> Decimal {
    items.iter().map(|item| item.non_taxed).sum()
}

/// Discount expressed both ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discount {
    pub amount: Decimal,
    pub percentage: Decimal,
}

/// Discount amount and percentage implied by an original and a desired price.
/// A zero original price yields a zero percentage rather than a division error.
pub fn discount_from_prices(original: Decimal, desired: Decimal) -> Discount {
    let amount = original - desired;
    let percentage = if original.is_zero() {
        Decimal::ZERO
    } else {
        amount / original * dec!(100)
    };
    Discount { amount, percentage }
}

/// Desired price and discount amount implied by an original price and a
/// discount percentage. Inverse of [`discount_from_prices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountedPrice {
    pub amount: Decimal,
    pub price: Decimal,
}

pub fn price_from_discount(original: Decimal, percentage: Decimal) -> DiscountedPrice {
    let amount = percentage / dec!(100) * original;
    DiscountedPrice {
        amount,
        price: original - amount,
    }
}

/// Income-tax (renta) retention: `total × rate / 100`, floored at zero.
pub fn income_tax_retention(rate_percent: Decimal, total: Decimal) -> Decimal {
    (total * rate_percent / dec!(100)).max(Decimal::ZERO)
}
