use chrono::NaiveDate;
use rust_decimal::Decimal;

use saldo_core::SettlementChannel;
use saldo_store::SaleStore;

use crate::LedgerResult;

/// Amounts one day's sales feed into each settlement bucket, net of
/// commission, tax and shipping deductions. Pure read+sum, no side effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SalesDeltas {
    /// Marketplace sales awaiting processor settlement.
    pub marketplace_pending: Decimal,
    /// Storefront sales awaiting platform payout.
    pub storefront_pending: Decimal,
    /// Direct-transfer sales, available immediately.
    pub direct_available: Decimal,
}

impl SalesDeltas {
    pub fn aggregate(store: &dyn SaleStore, date: NaiveDate) -> LedgerResult<Self> {
        let mut deltas = Self::default();
        for sale in store.sales_on(date)? {
            let net = sale.settlement_contribution();
            match sale.channel {
                SettlementChannel::Marketplace => deltas.marketplace_pending += net,
                SettlementChannel::Storefront => deltas.storefront_pending += net,
                SettlementChannel::Direct => deltas.direct_available += net,
            }
        }
        Ok(deltas)
    }
}
