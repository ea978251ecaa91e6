use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Outcome of a return claim. `Pending` contributes nothing to the ledger.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnResolution {
    Pending,
    Refund,
    ExchangeSame,
    ExchangeDifferent,
    NoRefund,
}

impl ReturnResolution {
    /// Terminal resolutions are the only ones that impact balances.
    pub fn is_terminal(self) -> bool {
        !matches!(self, ReturnResolution::Pending)
    }

    pub fn is_exchange(self) -> bool {
        matches!(
            self,
            ReturnResolution::ExchangeSame | ReturnResolution::ExchangeDifferent
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReturnResolution::Pending => "pending",
            ReturnResolution::Refund => "refund",
            ReturnResolution::ExchangeSame => "exchange_same",
            ReturnResolution::ExchangeDifferent => "exchange_different",
            ReturnResolution::NoRefund => "no_refund",
        }
    }
}

impl fmt::Display for ReturnResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnResolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReturnResolution::Pending),
            "refund" => Ok(ReturnResolution::Refund),
            "exchange_same" => Ok(ReturnResolution::ExchangeSame),
            "exchange_different" => Ok(ReturnResolution::ExchangeDifferent),
            "no_refund" => Ok(ReturnResolution::NoRefund),
            other => Err(format!("unknown return resolution: {other}")),
        }
    }
}

/// Whether the original sale's funds had already cleared the processor when
/// the return completed. Decides which balance absorbs a refund.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundsState {
    SettledToAvailable,
    PendingSettlement,
}

impl FundsState {
    pub fn as_str(self) -> &'static str {
        match self {
            FundsState::SettledToAvailable => "settled_to_available",
            FundsState::PendingSettlement => "pending_settlement",
        }
    }
}

impl fmt::Display for FundsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FundsState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "settled_to_available" => Ok(FundsState::SettledToAvailable),
            "pending_settlement" => Ok(FundsState::PendingSettlement),
            other => Err(format!("unknown funds state: {other}")),
        }
    }
}

/// A return claim tied to exactly one sale.
///
/// The ledger is only touched once the claim reaches a terminal resolution,
/// and then on `completed_on`, which is not necessarily the claim date.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaleReturn {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub claim_date: NaiveDate,
    pub completed_on: Option<NaiveDate>,
    pub resolution: ReturnResolution,
    /// Explicit amount refunded; when absent the sale's settlement
    /// contribution is used instead.
    pub refund_amount: Option<Decimal>,
    /// Shipping spent on the original shipment, lost with the return.
    pub outbound_shipping: Decimal,
    /// Shipping paid to bring the product back.
    pub return_shipping: Decimal,
    /// Shipping for the replacement unit on exchanges.
    pub reshipment_shipping: Decimal,
    pub product_recoverable: bool,
    pub funds_state: FundsState,
    /// Processor froze the refunded amount instead of releasing it.
    pub retained: bool,
    pub created_at: DateTime<Utc>,
}

impl SaleReturn {
    pub fn open(sale_id: Uuid, claim_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            sale_id,
            claim_date,
            completed_on: None,
            resolution: ReturnResolution::Pending,
            refund_amount: None,
            outbound_shipping: Decimal::ZERO,
            return_shipping: Decimal::ZERO,
            reshipment_shipping: Decimal::ZERO,
            product_recoverable: true,
            funds_state: FundsState::PendingSettlement,
            retained: false,
            created_at: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.resolution.is_terminal()
    }
}
