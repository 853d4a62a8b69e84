use crate::api::dtos::responses::UserProfileResponse;
use crate::api::extractors::auth::AuthUser;
use axum::{response::IntoResponse, Json};
use tracing::info;

pub async fn profile(AuthUser(user): AuthUser) -> impl IntoResponse {
    info!("Retrieving user profile: {}", user.username);

    Json(UserProfileResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        roles: vec![user.role],
    })
}
