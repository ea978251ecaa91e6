use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sales pathway determining when and where funds become available.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementChannel {
    /// Storefront platform sale settled through the platform's payout pipeline.
    Storefront,
    /// Marketplace sale settled through the payment processor.
    Marketplace,
    /// Direct-transfer sale, available immediately (no pending stage).
    Direct,
}

impl SettlementChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            SettlementChannel::Storefront => "storefront",
            SettlementChannel::Marketplace => "marketplace",
            SettlementChannel::Direct => "direct",
        }
    }
}

impl fmt::Display for SettlementChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettlementChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "storefront" => Ok(SettlementChannel::Storefront),
            "marketplace" => Ok(SettlementChannel::Marketplace),
            "direct" => Ok(SettlementChannel::Direct),
            other => Err(format!("unknown settlement channel: {other}")),
        }
    }
}

/// How the buyer paid; rate rules are keyed by channel plus method.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Processor,
    Card,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Processor => "processor",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processor" => Ok(PaymentMethod::Processor),
            "card" => Ok(PaymentMethod::Card),
            "transfer" => Ok(PaymentMethod::Transfer),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}
