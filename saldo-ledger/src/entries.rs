use chrono::NaiveDate;
use rust_decimal::Decimal;

use saldo_core::{EntryCategory, EntryKind};
use saldo_store::EntryStore;

use crate::LedgerResult;

/// Net impact of one day's manual entries on processor-available funds,
/// with the business/personal split kept for reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntriesDelta {
    pub net: Decimal,
    pub income: Decimal,
    pub business_expenses: Decimal,
    pub personal_expenses: Decimal,
}

impl EntriesDelta {
    pub fn aggregate(store: &dyn EntryStore, date: NaiveDate) -> LedgerResult<Self> {
        let mut delta = Self::default();
        for entry in store.entries_on(date)? {
            delta.net += entry.signed_amount();
            match (entry.kind, entry.category) {
                (EntryKind::Income, _) => delta.income += entry.amount,
                (EntryKind::Expense, EntryCategory::Business) => {
                    delta.business_expenses += entry.amount
                }
                (EntryKind::Expense, EntryCategory::Personal) => {
                    delta.personal_expenses += entry.amount
                }
            }
        }
        Ok(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use saldo_core::ManualEntry;
    use saldo_store::MemoryBackOffice;

    #[test]
    fn incomes_add_and_all_expenses_subtract() {
        let store = MemoryBackOffice::new();
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        store
            .insert_entry(&ManualEntry::new(
                date,
                EntryKind::Income,
                EntryCategory::Business,
                dec!(1000),
            ))
            .unwrap();
        store
            .insert_entry(&ManualEntry::new(
                date,
                EntryKind::Expense,
                EntryCategory::Business,
                dec!(300),
            ))
            .unwrap();
        store
            .insert_entry(&ManualEntry::new(
                date,
                EntryKind::Expense,
                EntryCategory::Personal,
                dec!(200),
            ))
            .unwrap();

        let delta = EntriesDelta::aggregate(&store, date).unwrap();
        assert_eq!(delta.net, dec!(500));
        assert_eq!(delta.income, dec!(1000));
        assert_eq!(delta.business_expenses, dec!(300));
        assert_eq!(delta.personal_expenses, dec!(200));
    }
}
