use chrono::NaiveDate;
use uuid::Uuid;

use saldo_core::{LedgerDay, ManualEntry, Product, ReturnDelta, Sale, SaleReturn};

use crate::StoreResult;

/// Sales records, read by date when aggregating a ledger day.
pub trait SaleStore: Send + Sync {
    fn insert_sale(&self, sale: &Sale) -> StoreResult<()>;
    fn update_sale(&self, sale: &Sale) -> StoreResult<()>;
    /// Remove a sale, returning the removed row so the caller can cascade
    /// from its date.
    fn delete_sale(&self, id: Uuid) -> StoreResult<Sale>;
    fn sale(&self, id: Uuid) -> StoreResult<Option<Sale>>;
    fn sales_on(&self, date: NaiveDate) -> StoreResult<Vec<Sale>>;
}

/// Return claims, read by completion date.
pub trait ReturnStore: Send + Sync {
    fn upsert_return(&self, ret: &SaleReturn) -> StoreResult<()>;
    fn sale_return(&self, id: Uuid) -> StoreResult<Option<SaleReturn>>;
    fn returns_completed_on(&self, date: NaiveDate) -> StoreResult<Vec<SaleReturn>>;
    fn returns_for_sale(&self, sale_id: Uuid) -> StoreResult<Vec<SaleReturn>>;
}

/// Manual expense/income entries, read by date.
pub trait EntryStore: Send + Sync {
    fn insert_entry(&self, entry: &ManualEntry) -> StoreResult<()>;
    fn delete_entry(&self, id: Uuid) -> StoreResult<ManualEntry>;
    fn entries_on(&self, date: NaiveDate) -> StoreResult<Vec<ManualEntry>>;
}

/// Inventory items referenced by sales for cost lookups.
pub trait ProductStore: Send + Sync {
    fn upsert_product(&self, product: &Product) -> StoreResult<()>;
    fn product(&self, id: Uuid) -> StoreResult<Option<Product>>;
    fn adjust_stock(&self, id: Uuid, depot_delta: i64, showroom_delta: i64) -> StoreResult<()>;
}

/// The ledger itself: one row per date, mutated only by the cascade.
pub trait LedgerStore: Send + Sync {
    fn day(&self, date: NaiveDate) -> StoreResult<Option<LedgerDay>>;
    /// All days at or after `date`, ascending by date.
    fn days_from(&self, date: NaiveDate) -> StoreResult<Vec<LedgerDay>>;
    /// The most recent day strictly before `date`.
    fn latest_before(&self, date: NaiveDate) -> StoreResult<Option<LedgerDay>>;
    fn earliest_date(&self) -> StoreResult<Option<NaiveDate>>;
    fn upsert_day(&self, day: &LedgerDay) -> StoreResult<()>;
    fn all_days(&self) -> StoreResult<Vec<LedgerDay>>;
}

/// Normalized per-return ledger deltas: the single source the cascade sums
/// when applying return impacts, replaced wholesale on finalization.
pub trait ReturnDeltaStore: Send + Sync {
    fn replace_delta(&self, delta: &ReturnDelta) -> StoreResult<()>;
    fn delete_delta(&self, return_id: Uuid) -> StoreResult<()>;
    fn deltas_on(&self, date: NaiveDate) -> StoreResult<Vec<ReturnDelta>>;
    fn deltas_between(&self, from: NaiveDate, to: NaiveDate) -> StoreResult<Vec<ReturnDelta>>;
}

/// Everything the settlement engine needs from one backing store.
pub trait BackOfficeStore:
    SaleStore + ReturnStore + EntryStore + ProductStore + LedgerStore + ReturnDeltaStore
{
}

impl<T> BackOfficeStore for T where
    T: SaleStore + ReturnStore + EntryStore + ProductStore + LedgerStore + ReturnDeltaStore
{
}
