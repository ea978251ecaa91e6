use chrono::NaiveDate;

use saldo_core::{round2, LedgerDay};
use saldo_store::BackOfficeStore;

use crate::{EntriesDelta, LedgerResult, ReturnsDeltas, SalesDeltas};

/// The three aggregator outputs for one date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DayInputs {
    pub sales: SalesDeltas,
    pub entries: EntriesDelta,
    pub returns: ReturnsDeltas,
}

impl DayInputs {
    pub fn load<S: BackOfficeStore>(store: &S, date: NaiveDate) -> LedgerResult<Self> {
        Ok(Self {
            sales: SalesDeltas::aggregate(store, date)?,
            entries: EntriesDelta::aggregate(store, date)?,
            returns: ReturnsDeltas::aggregate(store, date)?,
        })
    }
}

/// Recompute one day's closing balances from the prior day and the day's own
/// events. Pure: the stored row only contributes its date and the manually
/// recorded processed-today amounts.
///
/// A missing prior day is treated as a zero-balance opening.
pub fn recalculate_day(
    prior: Option<&LedgerDay>,
    day: &LedgerDay,
    inputs: &DayInputs,
) -> LedgerDay {
    let zero = LedgerDay::opening(day.date);
    let prior = prior.unwrap_or(&zero);

    let processor_available = prior.processor_available
        + inputs.entries.net
        + inputs.sales.direct_available
        + day.processor_settled_today
        + day.platform_settled_today
        - day.tax_withheld_today
        - inputs.returns.processor_available;
    let processor_pending = prior.processor_pending + inputs.sales.marketplace_pending
        - day.processor_settled_today
        - inputs.returns.processor_pending;
    let processor_held = prior.processor_held + inputs.returns.processor_held;
    let platform_pending = prior.platform_pending + inputs.sales.storefront_pending
        - day.platform_settled_today
        - inputs.returns.platform_pending;

    LedgerDay {
        date: day.date,
        processor_available: round2(processor_available),
        processor_pending: round2(processor_pending),
        processor_held: round2(processor_held),
        platform_pending: round2(platform_pending),
        processor_settled_today: day.processor_settled_today,
        platform_settled_today: day.platform_settled_today,
        tax_withheld_today: day.tax_withheld_today,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, day).unwrap()
    }

    #[test]
    fn cold_start_uses_zero_balances() {
        let day = LedgerDay::opening(date(1));
        let inputs = DayInputs {
            sales: SalesDeltas {
                direct_available: dec!(500),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = recalculate_day(None, &day, &inputs);
        assert_eq!(result.processor_available, dec!(500.00));
        assert_eq!(result.processor_pending, dec!(0.00));
        assert_eq!(result.platform_pending, dec!(0.00));
    }

    #[test]
    fn settlement_moves_pending_into_available() {
        let mut prior = LedgerDay::opening(date(1));
        prior.processor_pending = dec!(8000);
        let mut day = LedgerDay::carried_forward(&prior, date(2));
        day.processor_settled_today = dec!(8000);
        day.tax_withheld_today = dec!(160);

        let result = recalculate_day(Some(&prior), &day, &DayInputs::default());
        assert_eq!(result.processor_available, dec!(7840.00));
        assert_eq!(result.processor_pending, dec!(0.00));
    }

    #[test]
    fn every_balance_is_rounded_to_cents() {
        let day = LedgerDay::opening(date(1));
        let inputs = DayInputs {
            sales: SalesDeltas {
                marketplace_pending: dec!(33.333),
                storefront_pending: dec!(66.666),
                direct_available: dec!(0.005),
            },
            ..Default::default()
        };
        let result = recalculate_day(None, &day, &inputs);
        assert_eq!(result.processor_pending, dec!(33.33));
        assert_eq!(result.platform_pending, dec!(66.67));
        assert_eq!(result.processor_available, dec!(0.01));
    }
}
