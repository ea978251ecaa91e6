use chrono::NaiveDate;
use tracing::{debug, info, warn};

use saldo_core::LedgerDay;
use saldo_store::BackOfficeStore;

use crate::{day, DayInputs, LedgerError, LedgerResult};

/// Summary of one cascade run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CascadeReport {
    pub from: NaiveDate,
    pub through: NaiveDate,
    pub days_recalculated: usize,
}

/// Forward, date-ordered recomputation of the ledger.
///
/// Each day's balances derive from the immediately preceding day's freshly
/// recomputed values, so days are processed strictly sequentially and each
/// result is persisted before the next day is read. There is no cross-day
/// transaction and no exclusion against concurrent cascades: every day-write
/// is a complete, valid state on its own, and on failure the days already
/// written stay committed.
pub struct Cascade<'a, S: BackOfficeStore> {
    store: &'a S,
}

impl<'a, S: BackOfficeStore> Cascade<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetch the ledger row for `date`, creating it lazily when missing:
    /// seeded from the most recent earlier day, or a zero opening if the
    /// ledger has no earlier history.
    pub fn ensure_day(&self, date: NaiveDate) -> LedgerResult<LedgerDay> {
        if let Some(existing) = self.store.day(date)? {
            return Ok(existing);
        }
        let seed = match self.store.latest_before(date)? {
            Some(prior) => LedgerDay::carried_forward(&prior, date),
            None => {
                // A zero opening is correct for a brand-new ledger; in front
                // of existing history it may be masking missing data.
                if self.store.earliest_date()?.is_some() {
                    warn!(date = %date, "seeding zero opening before existing ledger history");
                }
                LedgerDay::opening(date)
            }
        };
        self.store.upsert_day(&seed)?;
        debug!(date = %date, "seeded ledger day");
        Ok(seed)
    }

    /// Recompute every ledger day at or after `from`, in ascending date
    /// order, persisting each before moving on.
    pub fn recalculate_from(&self, from: NaiveDate) -> LedgerResult<CascadeReport> {
        self.ensure_day(from)?;
        let days = self.store.days_from(from)?;
        let mut through = from;
        let mut recalculated = 0usize;
        for current in &days {
            let updated = self
                .recalculate_day(current)
                .and_then(|updated| {
                    self.store.upsert_day(&updated)?;
                    Ok(updated)
                })
                .map_err(|source| LedgerError::CascadeHalted {
                    date: current.date,
                    source: Box::new(source),
                })?;
            debug!(
                date = %updated.date,
                processor_available = %updated.processor_available,
                processor_pending = %updated.processor_pending,
                platform_pending = %updated.platform_pending,
                "recalculated ledger day"
            );
            through = updated.date;
            recalculated += 1;
        }
        info!(from = %from, through = %through, days = recalculated, "cascade finished");
        Ok(CascadeReport {
            from,
            through,
            days_recalculated: recalculated,
        })
    }

    fn recalculate_day(&self, current: &LedgerDay) -> LedgerResult<LedgerDay> {
        let prior = self.store.latest_before(current.date)?;
        let inputs = DayInputs::load(self.store, current.date)?;
        Ok(day::recalculate_day(prior.as_ref(), current, &inputs))
    }
}
