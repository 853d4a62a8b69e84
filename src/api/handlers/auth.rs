use crate::api::dtos::requests::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::api::dtos::responses::AuthResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::auth::UserContext;
use crate::domain::models::user::{NewUser, ROLE_USER};
use crate::error::AppError;
use crate::state::IdentityState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

pub async fn register(
    State(state): State<Arc<IdentityState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if state.user_repo.find_by_username(&payload.username).await?.is_some() {
        return Err(AppError::Validation("Username is already taken".to_string()));
    }
    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Validation("Email is already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|_| AppError::Internal)?;

    let user = state
        .user_repo
        .create(&NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
            role: ROLE_USER.to_string(),
        })
        .await?;

    info!("User registered: {}", user.id);

    Ok(Json(AuthResponse {
        access_token: state.token_service.generate_access_token(&user.username)?,
        refresh_token: state.token_service.generate_refresh_token(&user.username)?,
    }))
}

pub async fn login(
    State(state): State<Arc<IdentityState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_repo
        .find_by_username(&payload.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = bcrypt::verify(&payload.password, &user.password_hash)
        .map_err(|_| AppError::Internal)?;
    if !valid {
        return Err(AppError::Unauthorized("Invalid username or password".to_string()));
    }

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        access_token: state.token_service.generate_access_token(&user.username)?,
        refresh_token: state.token_service.generate_refresh_token(&user.username)?,
    }))
}

/// Mints a fresh access token from a valid refresh token. The refresh token
/// is returned unchanged: rotation is deliberately not performed.
pub async fn refresh(
    State(state): State<Arc<IdentityState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let claims = state.token_service.verify(&payload.refresh_token)?;

    let user = state
        .user_repo
        .find_by_username(&claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    info!("Token refreshed for user: {}", user.id);

    Ok(Json(AuthResponse {
        access_token: state.token_service.generate_access_token(&user.username)?,
        refresh_token: payload.refresh_token,
    }))
}

/// Internal validation endpoint; returns the identity the gateway injects
/// into the X-User-* headers.
pub async fn validate(AuthUser(user): AuthUser) -> impl IntoResponse {
    Json(UserContext {
        id: user.id,
        username: user.username,
        roles: vec![user.role],
    })
}
