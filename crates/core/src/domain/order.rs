use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    /// Should reference an existing product; the resolver tolerates a
    /// dangling reference.
    pub product_id: ProductId,
    pub quantity: u32,
    pub status: OrderStatus,
    pub shipping_address: String,
    /// Present only once the order has shipped.
    pub tracking_number: Option<String>,
    pub order_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::OrderStatus;

    #[test]
    fn status_labels_match_catalog_vocabulary() {
        assert_eq!(OrderStatus::Pending.label(), "Pending");
        assert_eq!(OrderStatus::Processing.label(), "Processing");
        assert_eq!(OrderStatus::Shipped.label(), "Shipped");
        assert_eq!(OrderStatus::Delivered.label(), "Delivered");
        assert_eq!(OrderStatus::Cancelled.label(), "Cancelled");
    }
}
