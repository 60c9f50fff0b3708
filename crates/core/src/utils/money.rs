//! Money helpers shared by pricing and reporting.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::MONEY_DECIMAL_PLACES;

/// Rounds a money amount to cents, midpoint away from zero (0.005 -> 0.01).
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_midpoint_goes_up() {
        assert_eq!(round_money(dec!(0.005)), dec!(0.01));
        assert_eq!(round_money(dec!(1.234)), dec!(1.23));
        assert_eq!(round_money(dec!(2.675)), dec!(2.68));
    }
}
