use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Empty means "order whatever is in the cart".
    #[serde(default)]
    pub items: Vec<CartItemRequest>,
    pub shipping_address: Option<String>,
    pub payment_method_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyOrderRequest {
    pub order_id: i64,
    pub shipping_address: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

#[derive(Deserialize)]
pub struct StockUpdateRequest {
    pub stock: i64,
}

/// Wire shape `{"items": {"<productId>": <quantity>}}`. IndexMap keeps the
/// insertion order the reserve compensation algorithm iterates in.
#[derive(Deserialize)]
pub struct ReservationRequest {
    pub items: IndexMap<i64, i64>,
}
