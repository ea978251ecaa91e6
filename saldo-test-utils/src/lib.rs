//! Fixture builders and seeded stores shared by the Saldo test suites.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use saldo_config::{RateRule, RateTable};
use saldo_core::{
    FundsState, PaymentMethod, Product, ReturnResolution, Sale, SaleReturn, SettlementChannel,
};
use saldo_store::{MemoryBackOffice, ProductStore};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Rate table mirroring a typical setup: marketplace and storefront sales
/// lose 13% commission and 7% tax, direct transfers pay a 0.8% processor fee.
pub fn standard_rates() -> RateTable {
    RateTable::new(vec![
        RateRule {
            channel: SettlementChannel::Marketplace,
            method: PaymentMethod::Processor,
            commission_pct: dec!(13),
            tax_pct: dec!(7),
            processor_fee_pct: dec!(0),
        },
        RateRule {
            channel: SettlementChannel::Storefront,
            method: PaymentMethod::Card,
            commission_pct: dec!(13),
            tax_pct: dec!(7),
            processor_fee_pct: dec!(0),
        },
        RateRule {
            channel: SettlementChannel::Direct,
            method: PaymentMethod::Transfer,
            commission_pct: dec!(0),
            tax_pct: dec!(0),
            processor_fee_pct: dec!(0.8),
        },
    ])
}

pub fn product() -> Product {
    let mut product = Product::new("SKU-100", "Desk lamp", dec!(4200), dec!(10000));
    product.stock_depot = 10;
    product
}

/// Memory store seeded with one product, ready for `BackOffice`.
pub fn seeded_store() -> (MemoryBackOffice, Product) {
    let store = MemoryBackOffice::new();
    let item = product();
    store.upsert_product(&item).expect("seed product");
    (store, item)
}

pub fn marketplace_sale(on: NaiveDate, gross: Decimal, product_id: Uuid) -> Sale {
    let mut sale = Sale::new(
        on,
        SettlementChannel::Marketplace,
        PaymentMethod::Processor,
        gross,
        Decimal::ZERO,
        product_id,
        "test-buyer",
    );
    sale.commission = dec!(0);
    sale.tax = dec!(0);
    sale
}

pub fn refund_return(
    sale: &Sale,
    completed: NaiveDate,
    funds_state: FundsState,
) -> SaleReturn {
    let mut ret = SaleReturn::open(sale.id, completed);
    ret.resolution = ReturnResolution::Refund;
    ret.completed_on = Some(completed);
    ret.funds_state = funds_state;
    ret
}
