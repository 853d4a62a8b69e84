use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One logical cart row per (user, product); re-adding sums quantities.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub price: f64,
}
