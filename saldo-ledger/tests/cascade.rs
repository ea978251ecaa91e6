//! End-to-end scenarios for the settlement recalculation engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use saldo_core::{
    EntryCategory, EntryKind, FundsState, LedgerDay, ManualEntry, PaymentMethod, ReturnDelta,
    ReturnResolution, Sale, SaleReturn, SettlementChannel,
};
use saldo_ledger::{recalculate_day, BackOffice, DayInputs, LedgerError, SaleDraft};
use saldo_store::{
    EntryStore, LedgerStore, MemoryBackOffice, ProductStore, ReturnDeltaStore, ReturnStore,
    SaleStore, StoreError, StoreResult,
};
use saldo_test_utils::{date, refund_return, seeded_store, standard_rates};

fn office() -> (BackOffice<MemoryBackOffice>, Uuid) {
    let (store, product) = seeded_store();
    (BackOffice::new(store, standard_rates()), product.id)
}

fn draft(
    on: NaiveDate,
    channel: SettlementChannel,
    method: PaymentMethod,
    gross: Decimal,
    product_id: Uuid,
) -> SaleDraft {
    SaleDraft {
        date: on,
        channel,
        method,
        gross,
        shipping: Decimal::ZERO,
        product_id,
        buyer: "ana".into(),
    }
}

fn day(office: &BackOffice<MemoryBackOffice>, on: NaiveDate) -> LedgerDay {
    office.store().day(on).unwrap().expect("ledger day exists")
}

#[test]
fn three_day_settlement_and_refund_scenario() {
    let (office, product_id) = office();
    let d1 = date(2024, 3, 1);
    let d2 = date(2024, 3, 2);
    let d3 = date(2024, 3, 3);

    // Day 1: marketplace sale, 13% commission + 7% tax on 10000 = 2000.
    let sale = office
        .record_sale(draft(
            d1,
            SettlementChannel::Marketplace,
            PaymentMethod::Processor,
            dec!(10000),
            product_id,
        ))
        .unwrap();
    assert_eq!(sale.settlement_contribution(), dec!(8000.00));
    let day1 = day(&office, d1);
    assert_eq!(day1.processor_pending, dec!(8000.00));
    assert_eq!(day1.processor_available, dec!(0.00));

    // Day 2: the processor settles the pending amount, no tax withheld.
    office
        .process_settlement(d2, dec!(8000), dec!(0), dec!(0))
        .unwrap();
    let day2 = day(&office, d2);
    assert_eq!(day2.processor_available, dec!(8000.00));
    assert_eq!(day2.processor_pending, dec!(0.00));

    // Day 3: the sale is refunded after its funds cleared.
    office
        .finalize_return(refund_return(&sale, d3, FundsState::SettledToAvailable))
        .unwrap();
    let day3 = day(&office, d3);
    assert_eq!(day3.processor_available, dec!(0.00));
    assert_eq!(day3.processor_pending, dec!(0.00));
    assert_eq!(day3.processor_held, dec!(0.00));
}

#[test]
fn cold_start_direct_sale_lands_in_available() {
    let (office, product_id) = office();
    let d1 = date(2024, 4, 1);
    office
        .record_sale(draft(
            d1,
            SettlementChannel::Direct,
            PaymentMethod::Transfer,
            dec!(10000),
            product_id,
        ))
        .unwrap();
    let day1 = day(&office, d1);
    // 0.8% processor fee on the transfer; shipping never enters.
    assert_eq!(day1.processor_available, dec!(9920.00));
    assert_eq!(day1.processor_pending, dec!(0.00));
    assert_eq!(day1.processor_held, dec!(0.00));
    assert_eq!(day1.platform_pending, dec!(0.00));
}

#[test]
fn exchange_deducts_shipping_where_refund_deducts_contribution() {
    let d1 = date(2024, 5, 1);
    let d2 = date(2024, 5, 2);

    // Exchange: the sale stands, only the return-leg shipping is lost.
    {
        let (office, product_id) = office();
        let sale = office
            .record_sale(draft(
                d1,
                SettlementChannel::Storefront,
                PaymentMethod::Card,
                dec!(10000),
                product_id,
            ))
            .unwrap();
        assert_eq!(day(&office, d1).platform_pending, dec!(8000.00));

        let mut exchange = SaleReturn::open(sale.id, d1);
        exchange.resolution = ReturnResolution::ExchangeSame;
        exchange.completed_on = Some(d2);
        exchange.return_shipping = dec!(350);
        office.finalize_return(exchange).unwrap();

        let day2 = day(&office, d2);
        assert_eq!(day2.platform_pending, dec!(7650.00));
        assert_eq!(day2.processor_available, dec!(0.00));
        assert_eq!(day2.processor_pending, dec!(0.00));
    }

    // Refund on the same setup: the full settlement contribution goes back.
    {
        let (office, product_id) = office();
        let sale = office
            .record_sale(draft(
                d1,
                SettlementChannel::Storefront,
                PaymentMethod::Card,
                dec!(10000),
                product_id,
            ))
            .unwrap();
        office
            .finalize_return(refund_return(&sale, d2, FundsState::SettledToAvailable))
            .unwrap();
        let day2 = day(&office, d2);
        assert_eq!(day2.platform_pending, dec!(8000.00));
        assert_eq!(day2.processor_available, dec!(-8000.00));
    }
}

#[test]
fn finalizing_the_same_return_twice_does_not_double_apply() {
    let (office, product_id) = office();
    let d1 = date(2024, 6, 1);
    let d2 = date(2024, 6, 2);
    let sale = office
        .record_sale(draft(
            d1,
            SettlementChannel::Marketplace,
            PaymentMethod::Processor,
            dec!(10000),
            product_id,
        ))
        .unwrap();

    let ret = refund_return(&sale, d2, FundsState::PendingSettlement);
    let first = office.finalize_return(ret.clone()).unwrap();
    let after_first = day(&office, d2);
    let second = office.finalize_return(ret).unwrap();
    let after_second = day(&office, d2);

    assert_eq!(first, second);
    assert_eq!(after_first, after_second);
    assert_eq!(after_second.processor_pending, dec!(0.00));
}

#[test]
fn amending_gross_reprices_commission_and_tax() {
    let (office, product_id) = office();
    let d1 = date(2025, 1, 1);
    let sale = office
        .record_sale(draft(
            d1,
            SettlementChannel::Marketplace,
            PaymentMethod::Processor,
            dec!(10000),
            product_id,
        ))
        .unwrap();
    assert_eq!(sale.commission, dec!(1300.00));
    assert_eq!(sale.tax, dec!(700.00));

    let mut amended = sale.clone();
    amended.gross = dec!(20000);
    office.amend_sale(amended).unwrap();

    // 13% commission and 7% tax follow the new gross.
    let stored = office.store().sale(sale.id).unwrap().unwrap();
    assert_eq!(stored.commission, dec!(2600.00));
    assert_eq!(stored.tax, dec!(1400.00));
    assert_eq!(day(&office, d1).processor_pending, dec!(16000.00));
}

#[test]
fn deleting_a_sale_voids_its_return_deltas() {
    let (office, product_id) = office();
    let d1 = date(2025, 2, 1);
    let d2 = date(2025, 2, 2);
    let sale = office
        .record_sale(draft(
            d1,
            SettlementChannel::Marketplace,
            PaymentMethod::Processor,
            dec!(10000),
            product_id,
        ))
        .unwrap();
    office
        .finalize_return(refund_return(&sale, d2, FundsState::PendingSettlement))
        .unwrap();
    assert_eq!(day(&office, d2).processor_pending, dec!(0.00));

    office.delete_sale(sale.id).unwrap();

    // The refund must not keep deducting revenue that no longer exists.
    assert!(office.store().deltas_on(d2).unwrap().is_empty());
    let day2 = day(&office, d2);
    assert_eq!(day2.processor_pending, dec!(0.00));
    assert_eq!(day2.processor_available, dec!(0.00));
}

#[test]
fn cascade_is_deterministic() {
    let (office, product_id) = office();
    let d1 = date(2024, 7, 1);
    let d2 = date(2024, 7, 2);
    office
        .record_sale(draft(
            d1,
            SettlementChannel::Marketplace,
            PaymentMethod::Processor,
            dec!(5000),
            product_id,
        ))
        .unwrap();
    office
        .record_entry(ManualEntry::new(
            d2,
            EntryKind::Expense,
            EntryCategory::Business,
            dec!(120),
        ))
        .unwrap();

    office.recalculate_from(d1).unwrap();
    let first: Vec<LedgerDay> = office.store().all_days().unwrap();
    office.recalculate_from(d1).unwrap();
    let second: Vec<LedgerDay> = office.store().all_days().unwrap();
    assert_eq!(first, second);
}

#[test]
fn backdated_entry_reflows_every_later_day() {
    let (office, product_id) = office();
    let d1 = date(2024, 8, 1);
    let d3 = date(2024, 8, 3);
    office
        .record_sale(draft(
            d1,
            SettlementChannel::Direct,
            PaymentMethod::Transfer,
            dec!(1000),
            product_id,
        ))
        .unwrap();
    office
        .record_sale(draft(
            d3,
            SettlementChannel::Direct,
            PaymentMethod::Transfer,
            dec!(1000),
            product_id,
        ))
        .unwrap();
    let before = day(&office, d3).processor_available;

    // Backdated expense on day 1 must reflow through day 3.
    office
        .record_entry(ManualEntry::new(
            d1,
            EntryKind::Expense,
            EntryCategory::Personal,
            dec!(500),
        ))
        .unwrap();
    let after = day(&office, d3).processor_available;
    assert_eq!(after, before - dec!(500));
}

#[test]
fn ledger_is_a_prefix_sum_over_days() {
    let (office, product_id) = office();
    let d1 = date(2024, 9, 1);
    let d2 = date(2024, 9, 2);
    let d3 = date(2024, 9, 3);
    let sale = office
        .record_sale(draft(
            d1,
            SettlementChannel::Marketplace,
            PaymentMethod::Processor,
            dec!(10000),
            product_id,
        ))
        .unwrap();
    office
        .process_settlement(d2, dec!(4000), dec!(0), dec!(80))
        .unwrap();
    office
        .finalize_return(refund_return(&sale, d3, FundsState::PendingSettlement))
        .unwrap();

    // Each stored day must equal the pure recomputation from its predecessor.
    let days = office.store().all_days().unwrap();
    assert_eq!(days.len(), 3);
    let mut prior: Option<LedgerDay> = None;
    for stored in days {
        let inputs = DayInputs::load(office.store(), stored.date).unwrap();
        let recomputed = recalculate_day(prior.as_ref(), &stored, &inputs);
        assert_eq!(recomputed, stored, "mismatch on {}", stored.date);
        prior = Some(stored);
    }
}

#[test]
fn missing_rate_aborts_before_any_mutation() {
    let (office, product_id) = office();
    let d1 = date(2024, 10, 1);
    let err = office
        .record_sale(draft(
            d1,
            SettlementChannel::Marketplace,
            PaymentMethod::Card,
            dec!(100),
            product_id,
        ))
        .unwrap_err();
    assert!(matches!(err, LedgerError::MissingRate { .. }));
    assert!(office.store().day(d1).unwrap().is_none());
    assert!(office.store().sales_on(d1).unwrap().is_empty());
}

#[test]
fn realized_loss_is_reported_without_moving_balances() {
    let (office, product_id) = office();
    let d1 = date(2024, 11, 1);
    let d2 = date(2024, 11, 2);
    let sale = office
        .record_sale(draft(
            d1,
            SettlementChannel::Marketplace,
            PaymentMethod::Processor,
            dec!(10000),
            product_id,
        ))
        .unwrap();

    let mut ret = SaleReturn::open(sale.id, d1);
    ret.resolution = ReturnResolution::NoRefund;
    ret.completed_on = Some(d2);
    ret.product_recoverable = false;
    office.finalize_return(ret).unwrap();

    assert_eq!(office.realized_losses(d1, d2).unwrap(), dec!(4200.00));
    // No-refund resolutions leave every balance as carried forward.
    let day2 = day(&office, d2);
    assert_eq!(day2.processor_pending, dec!(8000.00));
    assert_eq!(day2.processor_available, dec!(0.00));
}

/// Store wrapper that fails ledger writes from a given date onward, to pin
/// down halt-and-keep-prior-days behavior.
struct FailingLedger {
    inner: MemoryBackOffice,
    fail_on: NaiveDate,
}

impl SaleStore for FailingLedger {
    fn insert_sale(&self, sale: &Sale) -> StoreResult<()> {
        self.inner.insert_sale(sale)
    }
    fn update_sale(&self, sale: &Sale) -> StoreResult<()> {
        self.inner.update_sale(sale)
    }
    fn delete_sale(&self, id: Uuid) -> StoreResult<Sale> {
        self.inner.delete_sale(id)
    }
    fn sale(&self, id: Uuid) -> StoreResult<Option<Sale>> {
        self.inner.sale(id)
    }
    fn sales_on(&self, date: NaiveDate) -> StoreResult<Vec<Sale>> {
        self.inner.sales_on(date)
    }
}

impl ReturnStore for FailingLedger {
    fn upsert_return(&self, ret: &SaleReturn) -> StoreResult<()> {
        self.inner.upsert_return(ret)
    }
    fn sale_return(&self, id: Uuid) -> StoreResult<Option<SaleReturn>> {
        self.inner.sale_return(id)
    }
    fn returns_completed_on(&self, date: NaiveDate) -> StoreResult<Vec<SaleReturn>> {
        self.inner.returns_completed_on(date)
    }
    fn returns_for_sale(&self, sale_id: Uuid) -> StoreResult<Vec<SaleReturn>> {
        self.inner.returns_for_sale(sale_id)
    }
}

impl EntryStore for FailingLedger {
    fn insert_entry(&self, entry: &ManualEntry) -> StoreResult<()> {
        self.inner.insert_entry(entry)
    }
    fn delete_entry(&self, id: Uuid) -> StoreResult<ManualEntry> {
        self.inner.delete_entry(id)
    }
    fn entries_on(&self, date: NaiveDate) -> StoreResult<Vec<ManualEntry>> {
        self.inner.entries_on(date)
    }
}

impl ProductStore for FailingLedger {
    fn upsert_product(&self, product: &saldo_core::Product) -> StoreResult<()> {
        self.inner.upsert_product(product)
    }
    fn product(&self, id: Uuid) -> StoreResult<Option<saldo_core::Product>> {
        self.inner.product(id)
    }
    fn adjust_stock(&self, id: Uuid, depot: i64, showroom: i64) -> StoreResult<()> {
        self.inner.adjust_stock(id, depot, showroom)
    }
}

impl LedgerStore for FailingLedger {
    fn day(&self, date: NaiveDate) -> StoreResult<Option<LedgerDay>> {
        self.inner.day(date)
    }
    fn days_from(&self, date: NaiveDate) -> StoreResult<Vec<LedgerDay>> {
        self.inner.days_from(date)
    }
    fn latest_before(&self, date: NaiveDate) -> StoreResult<Option<LedgerDay>> {
        self.inner.latest_before(date)
    }
    fn earliest_date(&self) -> StoreResult<Option<NaiveDate>> {
        self.inner.earliest_date()
    }
    fn upsert_day(&self, day: &LedgerDay) -> StoreResult<()> {
        if day.date >= self.fail_on {
            return Err(StoreError::Storage("disk full".into()));
        }
        self.inner.upsert_day(day)
    }
    fn all_days(&self) -> StoreResult<Vec<LedgerDay>> {
        self.inner.all_days()
    }
}

impl ReturnDeltaStore for FailingLedger {
    fn replace_delta(&self, delta: &ReturnDelta) -> StoreResult<()> {
        self.inner.replace_delta(delta)
    }
    fn delete_delta(&self, return_id: Uuid) -> StoreResult<()> {
        self.inner.delete_delta(return_id)
    }
    fn deltas_on(&self, date: NaiveDate) -> StoreResult<Vec<ReturnDelta>> {
        self.inner.deltas_on(date)
    }
    fn deltas_between(&self, from: NaiveDate, to: NaiveDate) -> StoreResult<Vec<ReturnDelta>> {
        self.inner.deltas_between(from, to)
    }
}

#[test]
fn cascade_halts_at_failing_day_and_keeps_prior_writes() {
    let d1 = date(2024, 12, 1);
    let d2 = date(2024, 12, 2);
    let d3 = date(2024, 12, 3);

    let inner = MemoryBackOffice::new();
    for d in [d1, d2, d3] {
        inner.upsert_day(&LedgerDay::opening(d)).unwrap();
    }
    let sale_store = &inner;
    let mut sale = saldo_test_utils::marketplace_sale(d1, dec!(1000), Uuid::new_v4());
    sale.commission = dec!(0);
    sale_store.insert_sale(&sale).unwrap();

    let store = FailingLedger { inner, fail_on: d2 };
    let err = saldo_ledger::Cascade::new(&store)
        .recalculate_from(d1)
        .unwrap_err();
    match err {
        LedgerError::CascadeHalted { date: failed, .. } => assert_eq!(failed, d2),
        other => panic!("unexpected error: {other}"),
    }
    // Day 1 was recomputed and committed before the failure.
    assert_eq!(store.day(d1).unwrap().unwrap().processor_pending, dec!(1000.00));
    assert_eq!(store.day(d2).unwrap().unwrap().processor_pending, dec!(0));
}
