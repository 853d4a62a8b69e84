use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Canonical stored status values. Input comparison is case-insensitive;
/// the stored strings keep the historical casing clients depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Active,
    Cancelled,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Active => "ACTIVE",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Completed => "Completed",
        }
    }

    pub fn from_input(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("active") {
            Some(OrderStatus::Active)
        } else if s.eq_ignore_ascii_case("cancelled") {
            Some(OrderStatus::Cancelled)
        } else if s.eq_ignore_ascii_case("completed") {
            Some(OrderStatus::Completed)
        } else {
            None
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i64,
    pub user_id: i64,
    /// Σ price × quantity at creation time; frozen afterwards.
    pub total: f64,
    pub status: String,
    pub shipping_address: Option<String>,
    pub payment_method_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Unit price captured when the order was created.
    pub price: f64,
}

pub struct NewOrder {
    pub user_id: i64,
    pub total: f64,
    pub shipping_address: Option<String>,
    pub payment_method_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
    pub price: f64,
}
