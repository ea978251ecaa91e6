//! Typed settings for the Saldo back office: database location plus the
//! commission/tax/fee rate table applied when a sale is recorded.

mod rates;
mod settings;

pub use rates::{RateRule, RateTable, SaleCosts};
pub use settings::{ConfigError, DatabaseSettings, Settings};
