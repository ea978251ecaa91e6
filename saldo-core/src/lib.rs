//! Domain types shared across the Saldo settlement back office.

mod channel;
mod delta;
mod entry;
mod ledger_day;
mod money;
mod product;
mod returns;
mod sale;

pub use channel::{PaymentMethod, SettlementChannel};
pub use delta::ReturnDelta;
pub use entry::{EntryCategory, EntryKind, ManualEntry};
pub use ledger_day::LedgerDay;
pub use money::round2;
pub use product::Product;
pub use returns::{FundsState, ReturnResolution, SaleReturn};
pub use sale::Sale;
