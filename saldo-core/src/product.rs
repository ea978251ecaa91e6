use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inventory item referenced by sales and returns for cost lookups.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub cost: Decimal,
    pub price: Decimal,
    pub stock_depot: i64,
    pub stock_showroom: i64,
}

impl Product {
    pub fn new(sku: impl Into<String>, name: impl Into<String>, cost: Decimal, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            sku: sku.into(),
            name: name.into(),
            cost,
            price,
            stock_depot: 0,
            stock_showroom: 0,
        }
    }

    pub fn total_stock(&self) -> i64 {
        self.stock_depot + self.stock_showroom
    }

    pub fn margin(&self) -> Decimal {
        self.price - self.cost
    }
}
