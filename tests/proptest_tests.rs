//! Property-based tests for the tax arithmetic engine and normalization.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use svfe::core::*;

/// A reasonable price (0.01 to 99,999.99).
fn arb_price() -> impl Strategy<Value = Decimal> {
    (1u64..10_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

/// A quantity from 1 to 999.
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (1u64..1000u64).prop_map(|n| Decimal::from(n))
}

fn item(price: Decimal, base_price: Decimal, quantity: Decimal) -> CartItem {
    CartItem {
        product_name: "Producto".into(),
        product_code: "P-001".into(),
        tipo_item: 1,
        uni_medida: 59,
        quantity,
        price,
        base_price,
        discount_amount: (base_price - price).max(Decimal::ZERO),
        discount_percentage: Decimal::ZERO,
        non_subject_total: Decimal::ZERO,
        exempt_total: Decimal::ZERO,
        taxed_total: price * quantity,
        non_taxed: Decimal::ZERO,
    }
}

proptest! {
    #[test]
    fn undiscounted_totals_coincide(price in arb_price(), qty in arb_quantity()) {
        let items = [item(price, price, qty)];
        prop_assert_eq!(total(&items), total_without_discount(&items));
    }

    #[test]
    fn discounted_price_never_exceeds_catalog_total(
        price in arb_price(),
        discount_cents in 1u64..1000u64,
        qty in arb_quantity(),
    ) {
        // Sale price below the catalog floor: the discount direction.
        let base = price + Decimal::new(discount_cents as i64, 2);
        let items = [item(price, base, qty)];
        prop_assert!(total(&items) < total_without_discount(&items));
    }

    #[test]
    fn overpriced_sale_ignores_catalog_floor(
        base in arb_price(),
        markup_cents in 1u64..1000u64,
        qty in arb_quantity(),
    ) {
        // Sale price above the floor: no discount, both totals follow the price.
        let price = base + Decimal::new(markup_cents as i64, 2);
        let items = [item(price, base, qty)];
        prop_assert_eq!(total(&items), total_without_discount(&items));
    }

    #[test]
    fn retention_is_never_negative(rate in 0u64..100u64, total in 0u64..10_000_000u64) {
        let retained = income_tax_retention(Decimal::from(rate), Decimal::new(total as i64, 2));
        prop_assert!(retained >= Decimal::ZERO);
        if total == 0 {
            prop_assert_eq!(retained, Decimal::ZERO);
        }
    }

    #[test]
    fn round2_is_idempotent_and_close(price in arb_price(), divisor in 1u64..100u64) {
        let value = price / Decimal::from(divisor);
        let rounded = round2(value);
        prop_assert_eq!(round2(rounded), rounded);
        prop_assert!((rounded - value).abs() <= dec!(0.005));
    }

    #[test]
    fn extracted_iva_stays_inside_the_amount(amount in arb_price()) {
        let iva = iva_portion(amount);
        prop_assert!(iva >= Decimal::ZERO);
        prop_assert!(iva < amount);
    }

    #[test]
    fn words_render_for_any_amount_below_a_million(cents in 0u64..100_000_000u64) {
        let amount = Decimal::new(cents as i64, 2);
        let words = amount_in_words(amount).unwrap();
        prop_assert!(words.ends_with("/100 DOLARES AMERICANOS"));
        prop_assert!(!words.starts_with(' '));
    }

    #[test]
    fn normalization_is_idempotent(s in "[A-Za-z0-9 -]{0,12}") {
        match normalize_optional(&s) {
            None => {
                // Sentinel inputs stay absent.
                prop_assert!(s.is_empty() || s == "0" || s == "N/A");
            }
            Some(kept) => {
                prop_assert_eq!(normalize_optional(&kept), Some(kept.clone()));
                prop_assert_eq!(kept, s);
            }
        }
    }

    #[test]
    fn discount_round_trips_through_percentage(
        original in arb_price(),
        desired_fraction in 0u64..=100u64,
    ) {
        let desired = original * Decimal::from(desired_fraction) / dec!(100);
        let d = discount_from_prices(original, desired);
        let p = price_from_discount(original, d.percentage);
        prop_assert!((p.price - desired).abs() < dec!(0.000001));
    }
}
