use chrono::NaiveDate;
use rust_decimal::Decimal;

use saldo_core::{
    round2, FundsState, ReturnDelta, ReturnResolution, Sale, SaleReturn, SettlementChannel,
};
use saldo_store::ReturnDeltaStore;

use crate::{LedgerError, LedgerResult};

/// Ledger impact of a terminal return, as one normalized delta row.
///
/// Refunds deduct the explicit refunded amount when present, otherwise the
/// amount the sale actually contributed to settlement, so the ledger never
/// refunds more or less than was received. The deduction lands on
/// processor-available or processor-pending depending on whether the sale's
/// funds had already cleared, and a retained refund additionally parks the
/// amount in processor-held. Exchanges only lose the return-leg shipping; the
/// sale itself stands.
pub fn return_impact(
    ret: &SaleReturn,
    sale: &Sale,
    product_cost: Option<Decimal>,
) -> LedgerResult<ReturnDelta> {
    if !ret.resolution.is_terminal() {
        return Err(LedgerError::NotTerminal(ret.id));
    }
    let date = ret
        .completed_on
        .ok_or(LedgerError::MissingCompletionDate(ret.id))?;

    let mut delta = ReturnDelta::zero(ret.id, date);
    match ret.resolution {
        ReturnResolution::Refund => {
            let refund = round2(
                ret.refund_amount
                    .unwrap_or_else(|| sale.settlement_contribution()),
            );
            match ret.funds_state {
                FundsState::SettledToAvailable => delta.processor_available = refund,
                FundsState::PendingSettlement => delta.processor_pending = refund,
            }
            if ret.retained {
                delta.processor_held = refund;
            }
        }
        ReturnResolution::ExchangeSame | ReturnResolution::ExchangeDifferent => {
            let shipping = round2(ret.return_shipping);
            match sale.channel {
                SettlementChannel::Storefront => delta.platform_pending = shipping,
                SettlementChannel::Marketplace | SettlementChannel::Direct => {
                    delta.processor_available = shipping
                }
            }
        }
        // Pending was rejected by the terminal check above.
        ReturnResolution::NoRefund | ReturnResolution::Pending => {}
    }

    if !ret.product_recoverable {
        if let Some(cost) = product_cost {
            delta.realized_loss = round2(cost);
        }
    }
    Ok(delta)
}

/// Per-balance sums of the normalized delta rows completed on one date.
/// Summing the rows fresh each pass is what makes the cascade idempotent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReturnsDeltas {
    pub processor_available: Decimal,
    pub processor_pending: Decimal,
    pub processor_held: Decimal,
    pub platform_pending: Decimal,
    pub realized_loss: Decimal,
}

impl ReturnsDeltas {
    pub fn aggregate(store: &dyn ReturnDeltaStore, date: NaiveDate) -> LedgerResult<Self> {
        let mut totals = Self::default();
        for delta in store.deltas_on(date)? {
            totals.processor_available += delta.processor_available;
            totals.processor_pending += delta.processor_pending;
            totals.processor_held += delta.processor_held;
            totals.platform_pending += delta.platform_pending;
            totals.realized_loss += delta.realized_loss;
        }
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use saldo_core::PaymentMethod;
    use saldo_store::MemoryBackOffice;
    use uuid::Uuid;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
    }

    fn marketplace_sale() -> Sale {
        let mut sale = Sale::new(
            date(1),
            SettlementChannel::Marketplace,
            PaymentMethod::Processor,
            dec!(10000),
            dec!(0),
            Uuid::new_v4(),
            "buyer",
        );
        sale.commission = dec!(1300);
        sale.tax = dec!(700);
        sale
    }

    fn terminal_return(sale: &Sale, resolution: ReturnResolution) -> SaleReturn {
        let mut ret = SaleReturn::open(sale.id, date(2));
        ret.resolution = resolution;
        ret.completed_on = Some(date(5));
        ret
    }

    #[test]
    fn refund_falls_back_to_settlement_contribution() {
        let sale = marketplace_sale();
        let mut ret = terminal_return(&sale, ReturnResolution::Refund);
        ret.funds_state = FundsState::SettledToAvailable;
        let delta = return_impact(&ret, &sale, None).unwrap();
        assert_eq!(delta.processor_available, dec!(8000.00));
        assert_eq!(delta.processor_pending, dec!(0));
        assert_eq!(delta.processor_held, dec!(0));
    }

    #[test]
    fn refund_routes_to_pending_when_funds_not_cleared() {
        let sale = marketplace_sale();
        let mut ret = terminal_return(&sale, ReturnResolution::Refund);
        ret.funds_state = FundsState::PendingSettlement;
        ret.refund_amount = Some(dec!(7500));
        let delta = return_impact(&ret, &sale, None).unwrap();
        assert_eq!(delta.processor_pending, dec!(7500.00));
        assert_eq!(delta.processor_available, dec!(0));
    }

    #[test]
    fn retained_refund_parks_amount_in_held() {
        let sale = marketplace_sale();
        let mut ret = terminal_return(&sale, ReturnResolution::Refund);
        ret.funds_state = FundsState::SettledToAvailable;
        ret.retained = true;
        ret.refund_amount = Some(dec!(8000));
        let delta = return_impact(&ret, &sale, None).unwrap();
        assert_eq!(delta.processor_available, dec!(8000.00));
        assert_eq!(delta.processor_held, dec!(8000.00));
    }

    #[test]
    fn storefront_exchange_loses_only_return_shipping() {
        let mut sale = marketplace_sale();
        sale.channel = SettlementChannel::Storefront;
        let mut ret = terminal_return(&sale, ReturnResolution::ExchangeSame);
        ret.return_shipping = dec!(350);
        let delta = return_impact(&ret, &sale, None).unwrap();
        assert_eq!(delta.platform_pending, dec!(350.00));
        assert_eq!(delta.processor_available, dec!(0));
        assert_eq!(delta.processor_pending, dec!(0));
    }

    #[test]
    fn non_recoverable_product_records_realized_loss() {
        let sale = marketplace_sale();
        let mut ret = terminal_return(&sale, ReturnResolution::NoRefund);
        ret.product_recoverable = false;
        let delta = return_impact(&ret, &sale, Some(dec!(4200))).unwrap();
        assert_eq!(delta.realized_loss, dec!(4200.00));
        assert_eq!(delta.processor_available, dec!(0));
    }

    #[test]
    fn pending_return_is_rejected() {
        let sale = marketplace_sale();
        let ret = SaleReturn::open(sale.id, date(2));
        assert!(matches!(
            return_impact(&ret, &sale, None),
            Err(LedgerError::NotTerminal(_))
        ));
    }

    #[test]
    fn aggregation_sums_rows_without_double_counting() {
        let store = MemoryBackOffice::new();
        let sale = marketplace_sale();
        let mut ret = terminal_return(&sale, ReturnResolution::Refund);
        ret.funds_state = FundsState::SettledToAvailable;
        let delta = return_impact(&ret, &sale, None).unwrap();
        store.replace_delta(&delta).unwrap();
        // Re-finalizing replaces the row instead of stacking a second one.
        store.replace_delta(&delta).unwrap();

        let first = ReturnsDeltas::aggregate(&store, date(5)).unwrap();
        let second = ReturnsDeltas::aggregate(&store, date(5)).unwrap();
        assert_eq!(first.processor_available, dec!(8000.00));
        assert_eq!(first, second);
    }
}
