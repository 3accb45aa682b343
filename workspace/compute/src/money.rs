//! Rounding policy: every externally visible figure is rounded
//! half-away-from-zero, amounts to 2 decimal places and stored percents
//! to 4. Aggregate display figures round to 2 (or 1 for per-category
//! budget shares) at the call site via [`round_dp`].

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds half-away-from-zero to the given number of decimal places.
pub fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Money amounts are stored and reported with 2 decimal places.
pub fn round_amount(value: Decimal) -> Decimal {
    round_dp(value, 2)
}

/// Stored allocation percents keep 4 decimal places.
pub fn round_percent(value: Decimal) -> Decimal {
    round_dp(value, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_amount(dec("1.005")), dec("1.01"));
        assert_eq!(round_amount(dec("-1.005")), dec("-1.01"));
        assert_eq!(round_amount(dec("2.675")), dec("2.68"));
        assert_eq!(round_percent(dec("33.33335")), dec("33.3334"));
        assert_eq!(round_dp(dec("12.35"), 1), dec("12.4"));
    }

    #[test]
    fn rounding_is_stable_on_exact_values() {
        assert_eq!(round_amount(dec("10.10")), dec("10.10"));
        assert_eq!(round_percent(dec("25")), dec("25"));
    }
}
