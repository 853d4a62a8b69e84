use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::Span;

/// Identity propagated by the gateway. Order-service handlers trust these
/// headers; the gateway strips any client-supplied copies before injecting.
pub struct CallerIdentity {
    pub user_id: i64,
    pub username: Option<String>,
    pub roles: Vec<String>,
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-ID")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing X-User-ID header".to_string()))?;

        let username = parts
            .headers
            .get("X-User-Name")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let roles = parts
            .headers
            .get("X-User-Roles")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').map(|r| r.trim().to_string()).collect())
            .unwrap_or_default();

        Span::current().record("user_id", user_id);

        Ok(CallerIdentity {
            user_id,
            username,
            roles,
        })
    }
}
