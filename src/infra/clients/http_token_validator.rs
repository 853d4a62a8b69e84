use crate::domain::models::auth::UserContext;
use crate::domain::ports::TokenValidator;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

/// Gateway-side validation callback: presents the bearer token to the
/// user-service profile endpoint and turns the answer into a UserContext.
pub struct HttpTokenValidator {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ProfilePayload {
    id: i64,
    username: String,
    roles: Vec<String>,
}

impl HttpTokenValidator {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build user-service HTTP client"),
            base_url,
        }
    }
}

#[async_trait]
impl TokenValidator for HttpTokenValidator {
    async fn validate(&self, token: &str) -> Result<UserContext, AppError> {
        let res = self
            .client
            .get(format!("{}/users/profile", self.base_url))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| {
                error!("User service unreachable during validation: {}", e);
                AppError::Unauthorized("Authentication service unavailable".to_string())
            })?;

        let status = res.status();
        if status.is_client_error() {
            debug!("Token validation rejected: {}", status);
            return Err(AppError::Unauthorized("Invalid token".to_string()));
        }
        if status.is_server_error() {
            error!("User service error during validation: {}", status);
            return Err(AppError::Unauthorized("Authentication service unavailable".to_string()));
        }

        let profile = res.json::<ProfilePayload>().await.map_err(|e| {
            error!("Malformed profile payload: {}", e);
            AppError::Unauthorized("Authentication service unavailable".to_string())
        })?;

        debug!("Token validation successful for user: {}", profile.username);

        Ok(UserContext {
            id: profile.id,
            username: profile.username,
            roles: profile.roles,
        })
    }
}
