use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use saldo_config::RateTable;
use saldo_core::{
    LedgerDay, ManualEntry, PaymentMethod, ReturnDelta, Sale, SaleReturn, SettlementChannel,
};
use saldo_store::BackOfficeStore;

use crate::{return_impact, Cascade, CascadeReport, LedgerError, LedgerResult};

/// Fields supplied by the caller when recording a sale; commission, tax and
/// processor fee are derived from the rate table.
#[derive(Clone, Debug)]
pub struct SaleDraft {
    pub date: NaiveDate,
    pub channel: SettlementChannel,
    pub method: PaymentMethod,
    pub gross: Decimal,
    pub shipping: Decimal,
    pub product_id: Uuid,
    pub buyer: String,
}

/// Action layer tying storage mutations to cascade triggers.
///
/// Every mutation that can affect a historical date ends by cascading from
/// the earliest affected day, so the ledger's prefix-sum invariant holds
/// after each action returns.
pub struct BackOffice<S> {
    store: S,
    rates: RateTable,
}

impl<S: BackOfficeStore> BackOffice<S> {
    pub fn new(store: S, rates: RateTable) -> Self {
        Self { store, rates }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn cascade(&self) -> Cascade<'_, S> {
        Cascade::new(&self.store)
    }

    /// Price and record a sale, then cascade from its date. Fails before any
    /// ledger mutation when the rate rule or product is missing.
    pub fn record_sale(&self, draft: SaleDraft) -> LedgerResult<Sale> {
        let rule = self
            .rates
            .lookup(draft.channel, draft.method)
            .ok_or(LedgerError::MissingRate {
                channel: draft.channel,
                method: draft.method,
            })?;
        self.store
            .product(draft.product_id)?
            .ok_or(LedgerError::MissingProduct(draft.product_id))?;

        let costs = rule.price(draft.gross);
        let mut sale = Sale::new(
            draft.date,
            draft.channel,
            draft.method,
            draft.gross,
            draft.shipping,
            draft.product_id,
            draft.buyer,
        );
        sale.commission = costs.commission;
        sale.tax = costs.tax;
        sale.processor_fee = costs.processor_fee;

        self.store.insert_sale(&sale)?;
        self.store.adjust_stock(sale.product_id, -1, 0)?;
        info!(sale = %sale.id, date = %sale.date, channel = %sale.channel, "sale recorded");
        self.cascade().recalculate_from(sale.date)?;
        Ok(sale)
    }

    /// Replace a sale and cascade from the earlier of its old and new dates.
    /// Commission, tax and processor fee are re-derived from the rate table so
    /// the stored breakdown always matches the amended gross.
    pub fn amend_sale(&self, mut sale: Sale) -> LedgerResult<CascadeReport> {
        let existing = self
            .store
            .sale(sale.id)?
            .ok_or(LedgerError::MissingSale(sale.id))?;
        let rule = self
            .rates
            .lookup(sale.channel, sale.method)
            .ok_or(LedgerError::MissingRate {
                channel: sale.channel,
                method: sale.method,
            })?;
        let costs = rule.price(sale.gross);
        sale.commission = costs.commission;
        sale.tax = costs.tax;
        sale.processor_fee = costs.processor_fee;

        let from = existing.date.min(sale.date);
        self.store.update_sale(&sale)?;
        self.cascade().recalculate_from(from)
    }

    /// Remove a sale along with the ledger deltas of its finalized returns,
    /// then cascade from the earliest affected date. The return records
    /// themselves are kept as history; only their balance impact is voided.
    pub fn delete_sale(&self, id: Uuid) -> LedgerResult<CascadeReport> {
        let removed = self.store.delete_sale(id)?;
        let mut from = removed.date;
        for ret in self.store.returns_for_sale(id)? {
            self.store.delete_delta(ret.id)?;
            if let Some(completed) = ret.completed_on {
                from = from.min(completed);
            }
        }
        self.store.adjust_stock(removed.product_id, 1, 0)?;
        self.cascade().recalculate_from(from)
    }

    /// Open a return claim. Pending claims never touch the ledger, so no
    /// cascade runs here.
    pub fn open_return(&self, ret: SaleReturn) -> LedgerResult<SaleReturn> {
        self.store
            .sale(ret.sale_id)?
            .ok_or(LedgerError::MissingSale(ret.sale_id))?;
        self.store.upsert_return(&ret)?;
        Ok(ret)
    }

    /// Persist a terminal return, replace its normalized delta row and
    /// cascade from the completion date.
    pub fn finalize_return(&self, ret: SaleReturn) -> LedgerResult<ReturnDelta> {
        let sale = self
            .store
            .sale(ret.sale_id)?
            .ok_or(LedgerError::MissingSale(ret.sale_id))?;
        let product_cost = if ret.product_recoverable {
            None
        } else {
            self.store.product(sale.product_id)?.map(|p| p.cost)
        };
        let delta = return_impact(&ret, &sale, product_cost)?;

        let previously_terminal = self
            .store
            .sale_return(ret.id)?
            .map(|prev| prev.is_terminal())
            .unwrap_or(false);
        self.store.upsert_return(&ret)?;
        self.store.replace_delta(&delta)?;

        // Recovered stock comes back once, and exchanges ship a replacement.
        if !previously_terminal {
            let mut depot_delta = 0i64;
            if ret.product_recoverable {
                depot_delta += 1;
            }
            if ret.resolution.is_exchange() {
                depot_delta -= 1;
            }
            if depot_delta != 0 {
                self.store.adjust_stock(sale.product_id, depot_delta, 0)?;
            }
        }

        info!(
            ret = %ret.id,
            sale = %sale.id,
            resolution = %ret.resolution,
            date = %delta.date,
            "return finalized"
        );
        self.cascade().recalculate_from(delta.date)?;
        Ok(delta)
    }

    pub fn record_entry(&self, entry: ManualEntry) -> LedgerResult<CascadeReport> {
        self.store.insert_entry(&entry)?;
        self.cascade().recalculate_from(entry.date)
    }

    pub fn delete_entry(&self, id: Uuid) -> LedgerResult<CascadeReport> {
        let removed = self.store.delete_entry(id)?;
        self.cascade().recalculate_from(removed.date)
    }

    /// Record the amounts manually marked as transferred out of pending on a
    /// date (plus any tax withheld in the transfer) and cascade from there.
    pub fn process_settlement(
        &self,
        date: NaiveDate,
        processor_amount: Decimal,
        platform_amount: Decimal,
        tax_withheld: Decimal,
    ) -> LedgerResult<LedgerDay> {
        let mut day = self.cascade().ensure_day(date)?;
        day.processor_settled_today = processor_amount;
        day.platform_settled_today = platform_amount;
        day.tax_withheld_today = tax_withheld;
        self.store.upsert_day(&day)?;
        self.cascade().recalculate_from(date)?;
        self.store
            .day(date)?
            .ok_or_else(|| LedgerError::Store(saldo_store::StoreError::not_found(
                "ledger day",
                date,
            )))
    }

    /// Manually triggered recalculation, e.g. after an administrative fix.
    pub fn recalculate_from(&self, date: NaiveDate) -> LedgerResult<CascadeReport> {
        self.cascade().recalculate_from(date)
    }

    pub fn ledger_between(&self, from: NaiveDate, to: NaiveDate) -> LedgerResult<Vec<LedgerDay>> {
        let days = self
            .store
            .days_from(from)?
            .into_iter()
            .filter(|day| day.date <= to)
            .collect();
        Ok(days)
    }

    /// Total cost of non-recoverable returned products completed in a range.
    pub fn realized_losses(&self, from: NaiveDate, to: NaiveDate) -> LedgerResult<Decimal> {
        let total = self
            .store
            .deltas_between(from, to)?
            .iter()
            .map(|delta| delta.realized_loss)
            .sum();
        Ok(total)
    }
}
