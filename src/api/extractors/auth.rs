use crate::domain::models::user::User;
use crate::error::AppError;
use crate::state::IdentityState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::sync::Arc;
use tracing::Span;

/// Bearer-token extractor for the user-service's own protected routes
/// (profile, validate). Verifies the signature locally and loads the user.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<IdentityState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let state = <Arc<IdentityState> as FromRef<S>>::from_ref(state);
        let claims = state.token_service.verify(&token)?;

        let user = state
            .user_repo
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AppError::NotFound("User not found".to_string()))?;

        Span::current().record("user_id", user.id);

        Ok(AuthUser(user))
    }
}

pub fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts.headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    header.strip_prefix("Bearer ").map(|t| t.to_string())
}
