use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use saldo_core::{PaymentMethod, SettlementChannel};
use saldo_store::StoreError;

/// Result alias for engine operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Error type surfaced by the settlement engine.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no rate configured for {channel} sales paid by {method}")]
    MissingRate {
        channel: SettlementChannel,
        method: PaymentMethod,
    },
    #[error("sale {0} does not exist")]
    MissingSale(Uuid),
    #[error("product {0} does not exist")]
    MissingProduct(Uuid),
    #[error("return {0} does not exist")]
    MissingReturn(Uuid),
    #[error("return {0} has not reached a terminal resolution")]
    NotTerminal(Uuid),
    #[error("return {0} is terminal but has no completion date")]
    MissingCompletionDate(Uuid),
    /// A day's recompute failed mid-cascade. Days strictly before `date`
    /// keep their freshly written values.
    #[error("ledger recalculation halted at {date}: {source}")]
    CascadeHalted {
        date: NaiveDate,
        #[source]
        source: Box<LedgerError>,
    },
}
