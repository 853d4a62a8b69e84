use crate::api::dtos::requests::CartItemRequest;
use crate::api::dtos::responses::MessageResponse;
use crate::api::extractors::identity::CallerIdentity;
use crate::error::AppError;
use crate::state::OrdersState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

/// Adds a product to the caller's cart with a price snapshot from the
/// catalog. An existing row for the same product has its quantity summed.
pub async fn add_to_cart(
    State(state): State<Arc<OrdersState>>,
    caller: CallerIdentity,
    Json(payload): Json<CartItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let product = state
        .product_client
        .get_product(payload.product_id)
        .await
        .map_err(|_| AppError::InternalWithMsg("Failed to get product details".to_string()))?;

    match state
        .cart_repo
        .find_by_user_and_product(caller.user_id, payload.product_id)
        .await?
    {
        Some(existing) => {
            state
                .cart_repo
                .update_quantity(existing.id, existing.quantity + payload.quantity)
                .await?;
        }
        None => {
            state
                .cart_repo
                .insert(caller.user_id, payload.product_id, payload.quantity, product.price)
                .await?;
        }
    }

    info!("Cart add: user {} product {}", caller.user_id, payload.product_id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_data("Product added to cart successfully", product)),
    ))
}

pub async fn remove_from_cart(
    State(state): State<Arc<OrdersState>>,
    caller: CallerIdentity,
    Json(payload): Json<CartItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .cart_repo
        .find_by_user_and_product(caller.user_id, payload.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found in cart".to_string()))?;

    if item.quantity <= payload.quantity {
        state.cart_repo.delete(item.id).await?;
    } else {
        state
            .cart_repo
            .update_quantity(item.id, item.quantity - payload.quantity)
            .await?;
    }

    Ok(Json(MessageResponse::new("Product removed from cart successfully")))
}

pub async fn get_cart(
    State(state): State<Arc<OrdersState>>,
    caller: CallerIdentity,
) -> Result<impl IntoResponse, AppError> {
    let items = state.cart_repo.find_by_user(caller.user_id).await?;
    if items.is_empty() {
        return Err(AppError::NotFound("Cart is empty".to_string()));
    }
    Ok(Json(items))
}
