use crate::api::dtos::responses::MessageResponse;
use crate::domain::models::product::Product;
use crate::domain::ports::ProductClient;
use crate::error::AppError;
use async_trait::async_trait;
use axum::http::StatusCode;
use indexmap::IndexMap;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::error;

/// Order-service → product-service HTTP client. Upstream failures keep
/// their status and message so the saga can forward them verbatim.
pub struct HttpProductClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct ReservationPayload<'a> {
    items: &'a IndexMap<i64, i64>,
}

impl HttpProductClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build product-service HTTP client"),
            base_url,
        }
    }

    async fn post_items(&self, path: &str, items: &IndexMap<i64, i64>) -> Result<(), AppError> {
        let res = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&ReservationPayload { items })
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Product service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            return Err(upstream_error(res).await);
        }

        Ok(())
    }
}

async fn upstream_error(res: reqwest::Response) -> AppError {
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    // The catalog answers with its message envelope or the uniform error
    // body; either way the interesting part is the message field.
    let message = serde_json::from_str::<MessageResponse>(&text)
        .map(|m| m.message)
        .or_else(|_| {
            serde_json::from_str::<serde_json::Value>(&text)
                .map(|v| v["message"].as_str().unwrap_or(&text).to_string())
        })
        .unwrap_or(text);

    AppError::Upstream {
        status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
        message,
    }
}

#[async_trait]
impl ProductClient for HttpProductClient {
    async fn get_product(&self, product_id: i64) -> Result<Product, AppError> {
        let res = self
            .client
            .get(format!("{}/products/{}", self.base_url, product_id))
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Product service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            return Err(upstream_error(res).await);
        }

        res.json::<Product>().await.map_err(|e| {
            error!("Malformed product payload: {}", e);
            AppError::InternalWithMsg("Malformed product payload".to_string())
        })
    }

    async fn reserve(&self, items: &IndexMap<i64, i64>) -> Result<(), AppError> {
        self.post_items("/products/reserve", items).await
    }

    async fn rollback(&self, items: &IndexMap<i64, i64>) -> Result<(), AppError> {
        self.post_items("/products/rollback", items).await
    }
}
