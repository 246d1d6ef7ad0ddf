//! Currency precision helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` end to end; only the wire format
//! turns them into JSON numbers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places carried by a euro amount.
pub const CURRENCY_SCALE: u32 = 2;

/// Rounds an amount to currency precision (cents), half away from zero.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_currency_truncates_repeating_fraction() {
        assert_eq!(round_currency(dec!(1000) / dec!(3)), dec!(333.33));
    }

    #[test]
    fn test_round_currency_midpoint_away_from_zero() {
        assert_eq!(round_currency(dec!(0.125)), dec!(0.13));
        assert_eq!(round_currency(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn test_round_currency_keeps_exact_values() {
        assert_eq!(round_currency(dec!(3300)), dec!(3300));
        assert_eq!(round_currency(Decimal::ZERO), Decimal::ZERO);
    }
}
