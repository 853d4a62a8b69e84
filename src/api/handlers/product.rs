use crate::api::dtos::requests::{CreateProductRequest, ReservationRequest, StockUpdateRequest};
use crate::api::dtos::responses::MessageResponse;
use crate::domain::ports::ReserveOutcome;
use crate::error::AppError;
use crate::state::CatalogState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

pub async fn list_products(State(state): State<Arc<CatalogState>>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.product_repo.list().await?))
}

pub async fn get_product(
    State(state): State<Arc<CatalogState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let product = state
        .product_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product not found for productId: {}", id)))?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<Arc<CatalogState>>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    let product = state
        .product_repo
        .create(&payload.name, payload.price, payload.stock)
        .await?;

    info!("Product added: {}", product.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_data("Product added successfully", product)),
    ))
}

pub async fn delete_product(
    State(state): State<Arc<CatalogState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.product_repo.delete(id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

pub async fn update_stock(
    State(state): State<Arc<CatalogState>>,
    Path(id): Path<i64>,
    Json(payload): Json<StockUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let product = state
        .product_repo
        .set_stock(id, payload.stock)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product not found for productId: {}", id)))?;
    Ok(Json(product))
}

/// Reserves stock for every entry or none of them. Entries are processed in
/// insertion order; when one fails, the entries before it are restocked in
/// the same order and the failing entry's id is reported. All-or-nothing
/// holds per request, not across concurrent reservers.
pub async fn reserve_inventory(
    State(state): State<Arc<CatalogState>>,
    Json(payload): Json<ReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.items.is_empty() {
        return Err(AppError::Validation("No items to reserve".to_string()));
    }

    for (position, (&product_id, &quantity)) in payload.items.iter().enumerate() {
        let outcome = state.product_repo.try_reserve(product_id, quantity).await?;

        let error = match outcome {
            ReserveOutcome::Reserved => continue,
            ReserveOutcome::NotFound => {
                AppError::NotFound(format!("Product not found for productId: {}", product_id))
            }
            ReserveOutcome::InsufficientStock => AppError::Validation(format!(
                "Error: Not enough stock available for productId: {}",
                product_id
            )),
        };

        warn!(
            "Reserve failed at productId {}; restoring {} earlier entries",
            product_id, position
        );
        compensate_reserved(&state, &payload.items, position).await;
        return Err(error);
    }

    Ok(Json(MessageResponse::new("Success: Inventory reserved successfully")))
}

/// Adds the already-decremented entries back. Only entries strictly before
/// the failing position ever mutated stock. A restock error is logged and
/// the remaining entries are still attempted; the caller reports the
/// original reserve failure either way.
async fn compensate_reserved(
    state: &CatalogState,
    items: &indexmap::IndexMap<i64, i64>,
    failed_position: usize,
) {
    for (&product_id, &quantity) in items.iter().take(failed_position) {
        if let Err(e) = state.product_repo.restock(product_id, quantity).await {
            error!(
                "Restock failed for productId {} while compensating a reserve: {}",
                product_id, e
            );
        }
    }
}

/// Unconditional restock, used by the saga's compensation path. Halts at
/// the first missing product; earlier entries stay applied.
pub async fn rollback_inventory(
    State(state): State<Arc<CatalogState>>,
    Json(payload): Json<ReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.items.is_empty() {
        return Err(AppError::Validation("No items to rollback".to_string()));
    }

    for (&product_id, &quantity) in payload.items.iter() {
        let restocked = state.product_repo.restock(product_id, quantity).await?;
        if !restocked {
            return Err(AppError::NotFound("Error: Product not found for rollback".to_string()));
        }
    }

    Ok(Json(MessageResponse::new("Success: Inventory rolled back successfully")))
}
