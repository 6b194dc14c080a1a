//! Gross/net/participation computation for one act.

mod calculator;

pub use calculator::BillingCalculator;

use rust_decimal::Decimal;

/// Round a Decimal to `dp` decimal places using half-up (commercial
/// rounding).
pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}
