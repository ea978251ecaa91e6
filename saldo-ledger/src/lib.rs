//! Settlement ledger recalculation engine.
//!
//! Every ledger day is a pure function of the previous day's closing balances
//! and that day's events (sales, manual entries, finalized returns, processed
//! settlements). Any change to a historical event invalidates every later
//! day, so the engine recomputes forward in date order from the earliest
//! affected day: the cascade.

mod actions;
mod cascade;
mod day;
mod entries;
mod error;
mod returns;
mod sales;

pub use actions::{BackOffice, SaleDraft};
pub use cascade::{Cascade, CascadeReport};
pub use day::{recalculate_day, DayInputs};
pub use entries::EntriesDelta;
pub use error::{LedgerError, LedgerResult};
pub use returns::{return_impact, ReturnsDeltas};
pub use sales::SalesDeltas;
