use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normalized ledger impact of one finalized return, keyed by return id and
/// attributed to its completion date.
///
/// `processor_available`, `processor_pending` and `platform_pending` hold the
/// amount *deducted* from that balance (positive numbers); `processor_held`
/// holds the amount *added* to the processor hold. Day totals are always
/// derived by summing these rows fresh, never by mutating a running counter,
/// which is what makes repeated recalculation idempotent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnDelta {
    pub return_id: Uuid,
    pub date: NaiveDate,
    pub processor_available: Decimal,
    pub processor_pending: Decimal,
    pub processor_held: Decimal,
    pub platform_pending: Decimal,
    /// Cost of a non-recoverable returned product; reporting only, does not
    /// move balances.
    pub realized_loss: Decimal,
}

impl ReturnDelta {
    pub fn zero(return_id: Uuid, date: NaiveDate) -> Self {
        Self {
            return_id,
            date,
            processor_available: Decimal::ZERO,
            processor_pending: Decimal::ZERO,
            processor_held: Decimal::ZERO,
            platform_pending: Decimal::ZERO,
            realized_loss: Decimal::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.processor_available.is_zero()
            && self.processor_pending.is_zero()
            && self.processor_held.is_zero()
            && self.platform_pending.is_zero()
            && self.realized_loss.is_zero()
    }
}
