use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::SettlementChannel;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Expense,
    Income,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Expense => "expense",
            EntryKind::Income => "income",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(EntryKind::Expense),
            "income" => Ok(EntryKind::Income),
            other => Err(format!("unknown entry kind: {other}")),
        }
    }
}

/// Personal entries reduce the same processor-available balance as business
/// ones; the category only splits reporting.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryCategory {
    Business,
    Personal,
}

impl EntryCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryCategory::Business => "business",
            EntryCategory::Personal => "personal",
        }
    }
}

impl fmt::Display for EntryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business" => Ok(EntryCategory::Business),
            "personal" => Ok(EntryCategory::Personal),
            other => Err(format!("unknown entry category: {other}")),
        }
    }
}

/// Manually recorded expense or income hitting processor-available funds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ManualEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub category: EntryCategory,
    pub amount: Decimal,
    pub channel: Option<SettlementChannel>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ManualEntry {
    pub fn new(
        date: NaiveDate,
        kind: EntryKind,
        category: EntryCategory,
        amount: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            kind,
            category,
            amount,
            channel: None,
            note: None,
            created_at: Utc::now(),
        }
    }

    /// Incomes add, expenses subtract.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn expenses_are_negative() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let expense = ManualEntry::new(date, EntryKind::Expense, EntryCategory::Personal, dec!(50));
        let income = ManualEntry::new(date, EntryKind::Income, EntryCategory::Business, dec!(50));
        assert_eq!(expense.signed_amount(), dec!(-50));
        assert_eq!(income.signed_amount(), dec!(50));
    }
}
