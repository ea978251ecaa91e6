use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{round2, PaymentMethod, SettlementChannel};

/// A single sales transaction on one of the settlement channels.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub date: NaiveDate,
    pub channel: SettlementChannel,
    pub method: PaymentMethod,
    /// Price paid by the buyer, shipping included where the seller bears it.
    pub gross: Decimal,
    pub shipping: Decimal,
    pub commission: Decimal,
    pub tax: Decimal,
    pub processor_fee: Decimal,
    pub product_id: Uuid,
    pub buyer: String,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        channel: SettlementChannel,
        method: PaymentMethod,
        gross: Decimal,
        shipping: Decimal,
        product_id: Uuid,
        buyer: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            channel,
            method,
            gross,
            shipping,
            commission: Decimal::ZERO,
            tax: Decimal::ZERO,
            processor_fee: Decimal::ZERO,
            product_id,
            buyer: buyer.into(),
            created_at: Utc::now(),
        }
    }

    /// Net amount this sale feeds into its channel's settlement bucket.
    ///
    /// Marketplace and storefront sales lose commission, tax and the shipping
    /// deduction before settling. Direct-transfer sales only pay the processor
    /// fee; shipping is excluded because the buyer bears it.
    pub fn settlement_contribution(&self) -> Decimal {
        let net = match self.channel {
            SettlementChannel::Marketplace | SettlementChannel::Storefront => {
                self.gross - self.commission - self.tax - self.shipping
            }
            SettlementChannel::Direct => self.gross - self.processor_fee,
        };
        round2(net)
    }
}
