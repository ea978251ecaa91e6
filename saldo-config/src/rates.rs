use rust_decimal::Decimal;
use serde::Deserialize;

use saldo_core::{round2, PaymentMethod, SettlementChannel};

/// Commission, tax and processor-fee percentages for one channel+method pair.
#[derive(Clone, Debug, Deserialize)]
pub struct RateRule {
    pub channel: SettlementChannel,
    pub method: PaymentMethod,
    pub commission_pct: Decimal,
    pub tax_pct: Decimal,
    pub processor_fee_pct: Decimal,
}

/// Deductions computed for a sale from its rate rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaleCosts {
    pub commission: Decimal,
    pub tax: Decimal,
    pub processor_fee: Decimal,
}

impl RateRule {
    /// Percentage deductions on a gross price, each rounded to cents.
    pub fn price(&self, gross: Decimal) -> SaleCosts {
        let hundred = Decimal::ONE_HUNDRED;
        SaleCosts {
            commission: round2(gross * self.commission_pct / hundred),
            tax: round2(gross * self.tax_pct / hundred),
            processor_fee: round2(gross * self.processor_fee_pct / hundred),
        }
    }
}

/// Lookup table of rate rules. A sale on a channel+method combination with no
/// rule is rejected before it ever touches the ledger.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RateTable {
    pub rules: Vec<RateRule>,
}

impl RateTable {
    pub fn new(rules: Vec<RateRule>) -> Self {
        Self { rules }
    }

    pub fn lookup(&self, channel: SettlementChannel, method: PaymentMethod) -> Option<&RateRule> {
        self.rules
            .iter()
            .find(|rule| rule.channel == channel && rule.method == method)
    }
}
