use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct UserProfileResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

/// Catalog/cart message envelope (`{message, data?}`).
#[derive(Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(message: impl Into<String>, data: impl Serialize) -> Self {
        Self {
            message: message.into(),
            data: serde_json::to_value(data).ok(),
        }
    }
}

/// Saga response shape: failures keep the same envelope with
/// `status = "failed"` and a null orderId.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: Option<i64>,
    pub status: String,
    pub message: String,
}

impl OrderResponse {
    pub fn success(order_id: i64, message: impl Into<String>) -> Self {
        Self {
            order_id: Some(order_id),
            status: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            order_id: None,
            status: "failed".to_string(),
            message: message.into(),
        }
    }
}
