use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use parking_lot::RwLock;
use uuid::Uuid;

use saldo_core::{LedgerDay, ManualEntry, Product, ReturnDelta, Sale, SaleReturn};

use crate::{
    EntryStore, LedgerStore, ProductStore, ReturnDeltaStore, ReturnStore, SaleStore, StoreError,
    StoreResult,
};

#[derive(Debug, Default)]
struct State {
    sales: HashMap<Uuid, Sale>,
    returns: HashMap<Uuid, SaleReturn>,
    entries: HashMap<Uuid, ManualEntry>,
    products: HashMap<Uuid, Product>,
    days: BTreeMap<NaiveDate, LedgerDay>,
    deltas: HashMap<Uuid, ReturnDelta>,
}

/// In-memory store with the same semantics as the SQLite backend. Used by
/// tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryBackOffice {
    state: RwLock<State>,
}

impl MemoryBackOffice {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaleStore for MemoryBackOffice {
    fn insert_sale(&self, sale: &Sale) -> StoreResult<()> {
        self.state.write().sales.insert(sale.id, sale.clone());
        Ok(())
    }

    fn update_sale(&self, sale: &Sale) -> StoreResult<()> {
        let mut state = self.state.write();
        if !state.sales.contains_key(&sale.id) {
            return Err(StoreError::not_found("sale", sale.id));
        }
        state.sales.insert(sale.id, sale.clone());
        Ok(())
    }

    fn delete_sale(&self, id: Uuid) -> StoreResult<Sale> {
        self.state
            .write()
            .sales
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("sale", id))
    }

    fn sale(&self, id: Uuid) -> StoreResult<Option<Sale>> {
        Ok(self.state.read().sales.get(&id).cloned())
    }

    fn sales_on(&self, date: NaiveDate) -> StoreResult<Vec<Sale>> {
        let mut sales: Vec<Sale> = self
            .state
            .read()
            .sales
            .values()
            .filter(|sale| sale.date == date)
            .cloned()
            .collect();
        sales.sort_by_key(|sale| sale.created_at);
        Ok(sales)
    }
}

impl ReturnStore for MemoryBackOffice {
    fn upsert_return(&self, ret: &SaleReturn) -> StoreResult<()> {
        self.state.write().returns.insert(ret.id, ret.clone());
        Ok(())
    }

    fn sale_return(&self, id: Uuid) -> StoreResult<Option<SaleReturn>> {
        Ok(self.state.read().returns.get(&id).cloned())
    }

    fn returns_completed_on(&self, date: NaiveDate) -> StoreResult<Vec<SaleReturn>> {
        let mut returns: Vec<SaleReturn> = self
            .state
            .read()
            .returns
            .values()
            .filter(|ret| ret.completed_on == Some(date))
            .cloned()
            .collect();
        returns.sort_by_key(|ret| ret.created_at);
        Ok(returns)
    }

    fn returns_for_sale(&self, sale_id: Uuid) -> StoreResult<Vec<SaleReturn>> {
        let mut returns: Vec<SaleReturn> = self
            .state
            .read()
            .returns
            .values()
            .filter(|ret| ret.sale_id == sale_id)
            .cloned()
            .collect();
        returns.sort_by_key(|ret| ret.created_at);
        Ok(returns)
    }
}

impl EntryStore for MemoryBackOffice {
    fn insert_entry(&self, entry: &ManualEntry) -> StoreResult<()> {
        self.state.write().entries.insert(entry.id, entry.clone());
        Ok(())
    }

    fn delete_entry(&self, id: Uuid) -> StoreResult<ManualEntry> {
        self.state
            .write()
            .entries
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("entry", id))
    }

    fn entries_on(&self, date: NaiveDate) -> StoreResult<Vec<ManualEntry>> {
        let mut entries: Vec<ManualEntry> = self
            .state
            .read()
            .entries
            .values()
            .filter(|entry| entry.date == date)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.created_at);
        Ok(entries)
    }
}

impl ProductStore for MemoryBackOffice {
    fn upsert_product(&self, product: &Product) -> StoreResult<()> {
        self.state.write().products.insert(product.id, product.clone());
        Ok(())
    }

    fn product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        Ok(self.state.read().products.get(&id).cloned())
    }

    fn adjust_stock(&self, id: Uuid, depot_delta: i64, showroom_delta: i64) -> StoreResult<()> {
        let mut state = self.state.write();
        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("product", id))?;
        product.stock_depot += depot_delta;
        product.stock_showroom += showroom_delta;
        Ok(())
    }
}

impl LedgerStore for MemoryBackOffice {
    fn day(&self, date: NaiveDate) -> StoreResult<Option<LedgerDay>> {
        Ok(self.state.read().days.get(&date).cloned())
    }

    fn days_from(&self, date: NaiveDate) -> StoreResult<Vec<LedgerDay>> {
        Ok(self
            .state
            .read()
            .days
            .range(date..)
            .map(|(_, day)| day.clone())
            .collect())
    }

    fn latest_before(&self, date: NaiveDate) -> StoreResult<Option<LedgerDay>> {
        Ok(self
            .state
            .read()
            .days
            .range(..date)
            .next_back()
            .map(|(_, day)| day.clone()))
    }

    fn earliest_date(&self) -> StoreResult<Option<NaiveDate>> {
        Ok(self.state.read().days.keys().next().copied())
    }

    fn upsert_day(&self, day: &LedgerDay) -> StoreResult<()> {
        self.state.write().days.insert(day.date, day.clone());
        Ok(())
    }

    fn all_days(&self) -> StoreResult<Vec<LedgerDay>> {
        Ok(self.state.read().days.values().cloned().collect())
    }
}

impl ReturnDeltaStore for MemoryBackOffice {
    fn replace_delta(&self, delta: &ReturnDelta) -> StoreResult<()> {
        self.state.write().deltas.insert(delta.return_id, delta.clone());
        Ok(())
    }

    fn delete_delta(&self, return_id: Uuid) -> StoreResult<()> {
        self.state.write().deltas.remove(&return_id);
        Ok(())
    }

    fn deltas_on(&self, date: NaiveDate) -> StoreResult<Vec<ReturnDelta>> {
        Ok(self
            .state
            .read()
            .deltas
            .values()
            .filter(|delta| delta.date == date)
            .cloned()
            .collect())
    }

    fn deltas_between(&self, from: NaiveDate, to: NaiveDate) -> StoreResult<Vec<ReturnDelta>> {
        Ok(self
            .state
            .read()
            .deltas
            .values()
            .filter(|delta| delta.date >= from && delta.date <= to)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn ledger_range_queries_match_sqlite_semantics() {
        let store = MemoryBackOffice::new();
        for day in [12u32, 10, 11] {
            store.upsert_day(&LedgerDay::opening(date(day))).unwrap();
        }
        let dates: Vec<_> = store
            .days_from(date(11))
            .unwrap()
            .iter()
            .map(|d| d.date)
            .collect();
        assert_eq!(dates, vec![date(11), date(12)]);
        assert_eq!(store.latest_before(date(11)).unwrap().unwrap().date, date(10));
        assert_eq!(store.earliest_date().unwrap(), Some(date(10)));
    }

    #[test]
    fn delete_missing_sale_reports_not_found() {
        let store = MemoryBackOffice::new();
        let err = store.delete_sale(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "sale", .. }));
    }

    #[test]
    fn delta_replacement_keeps_one_row_per_return() {
        let store = MemoryBackOffice::new();
        let id = Uuid::new_v4();
        let mut delta = ReturnDelta::zero(id, date(5));
        delta.processor_pending = dec!(100);
        store.replace_delta(&delta).unwrap();
        delta.processor_pending = dec!(150);
        store.replace_delta(&delta).unwrap();
        let on_day = store.deltas_on(date(5)).unwrap();
        assert_eq!(on_day.len(), 1);
        assert_eq!(on_day[0].processor_pending, dec!(150));
    }
}
