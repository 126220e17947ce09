//! Money presentation
//!
//! Amounts are carried as full-precision [`Decimal`] values through every
//! calculation and are only rounded to cents here, when they are shown.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso};

/// Currency every price in the catalog is quoted in.
pub const CURRENCY: &iso::Currency = iso::USD;

/// Round an amount to cents, half away from zero.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round an amount to cents as a [`Money`] value.
pub fn to_money(amount: Decimal) -> Money<'static, iso::Currency> {
    Money::from_decimal(round_cents(amount), CURRENCY)
}

/// Format an amount for display, e.g. `$46.19`.
pub fn format_amount(amount: Decimal) -> String {
    to_money(amount).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_cents_rounds_half_away_from_zero() {
        assert_eq!(round_cents(Decimal::new(3_205, 3)), Decimal::new(321, 2));
        assert_eq!(round_cents(Decimal::new(3_204, 3)), Decimal::new(320, 2));
    }

    #[test]
    fn round_cents_keeps_exact_values() {
        assert_eq!(round_cents(Decimal::new(4619, 2)), Decimal::new(4619, 2));
    }

    #[test]
    fn to_money_uses_the_catalog_currency() {
        let money = to_money(Decimal::new(2_999, 3));

        assert_eq!(money.currency(), CURRENCY);
        assert_eq!(*money.amount(), Decimal::new(300, 2));
    }
}
