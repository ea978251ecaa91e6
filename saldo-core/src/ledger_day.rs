use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::round2;

/// One row of the settlement ledger: closing balances for a calendar date.
///
/// The four closing balances are a strict prefix sum over time: each day's
/// values equal the previous day's plus that day's sale, return, manual-entry
/// and settlement impacts. Rows are created lazily, seeded from the most
/// recent earlier day, and mutated only by the recalculation cascade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerDay {
    pub date: NaiveDate,
    /// Funds freely usable at the payment processor.
    pub processor_available: Decimal,
    /// Funds earned via the processor rail but not yet transferred.
    pub processor_pending: Decimal,
    /// Funds frozen at the processor pending dispute resolution.
    pub processor_held: Decimal,
    /// Funds earned via the storefront platform rail, awaiting payout.
    pub platform_pending: Decimal,
    /// Amount moved today from processor-pending into available.
    pub processor_settled_today: Decimal,
    /// Amount moved today from platform-pending into available.
    pub platform_settled_today: Decimal,
    /// Tax withheld in today's settlement transfers.
    pub tax_withheld_today: Decimal,
}

impl LedgerDay {
    /// Zero-state opening row for the first day the ledger sees.
    pub fn opening(date: NaiveDate) -> Self {
        Self {
            date,
            processor_available: Decimal::ZERO,
            processor_pending: Decimal::ZERO,
            processor_held: Decimal::ZERO,
            platform_pending: Decimal::ZERO,
            processor_settled_today: Decimal::ZERO,
            platform_settled_today: Decimal::ZERO,
            tax_withheld_today: Decimal::ZERO,
        }
    }

    /// Seed a new day from an earlier day's closing balances. The same-day
    /// processed amounts start at zero; they belong to the new day alone.
    pub fn carried_forward(prior: &LedgerDay, date: NaiveDate) -> Self {
        Self {
            date,
            processor_available: prior.processor_available,
            processor_pending: prior.processor_pending,
            processor_held: prior.processor_held,
            platform_pending: prior.platform_pending,
            processor_settled_today: Decimal::ZERO,
            platform_settled_today: Decimal::ZERO,
            tax_withheld_today: Decimal::ZERO,
        }
    }

    /// Available plus pending at the processor. Derived, never stored.
    pub fn processor_total(&self) -> Decimal {
        self.processor_available + self.processor_pending
    }

    /// Available plus platform-pending. Derived, never stored.
    pub fn grand_total(&self) -> Decimal {
        self.processor_available + self.platform_pending
    }

    /// Day-over-day movement of all tracked funds.
    pub fn net_movement(&self, prior: Option<&LedgerDay>) -> Decimal {
        let current = self.grand_total() + self.processor_pending + self.processor_held;
        let previous = prior
            .map(|p| p.grand_total() + p.processor_pending + p.processor_held)
            .unwrap_or(Decimal::ZERO);
        round2(current - previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(date: NaiveDate) -> LedgerDay {
        let mut day = LedgerDay::opening(date);
        day.processor_available = dec!(100);
        day.processor_pending = dec!(40);
        day.processor_held = dec!(5);
        day.platform_pending = dec!(25);
        day
    }

    #[test]
    fn derived_totals() {
        let day = day(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(day.processor_total(), dec!(140));
        assert_eq!(day.grand_total(), dec!(125));
    }

    #[test]
    fn carried_forward_resets_processed_amounts() {
        let mut prior = day(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        prior.processor_settled_today = dec!(40);
        let next = LedgerDay::carried_forward(&prior, NaiveDate::from_ymd_opt(2024, 2, 2).unwrap());
        assert_eq!(next.processor_available, dec!(100));
        assert_eq!(next.processor_settled_today, dec!(0));
        assert_eq!(next.net_movement(Some(&prior)), dec!(0));
    }
}
