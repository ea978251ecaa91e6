use rust_decimal::{Decimal, RoundingStrategy};

/// Normalize a money amount to 2 decimal places, half away from zero.
///
/// Every balance persisted to the ledger goes through this so that rounding
/// drift cannot accumulate across a recalculation cascade.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
