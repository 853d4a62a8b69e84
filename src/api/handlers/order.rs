use crate::api::dtos::requests::{ModifyOrderRequest, OrderRequest};
use crate::api::dtos::responses::OrderResponse;
use crate::api::extractors::identity::CallerIdentity;
use crate::domain::models::order::{NewOrder, NewOrderItem, Order, OrderStatus};
use crate::error::AppError;
use crate::state::OrdersState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{error, info, warn};

fn saga_failure(err: AppError) -> Response {
    let (status, message) = err.status_and_message();
    (status, Json(OrderResponse::failed(message))).into_response()
}

/// Order placement saga: resolve items → price snapshot → reserve →
/// persist locally (order + items + cart drain in one transaction). No
/// order row exists until the reservation has succeeded.
pub async fn create_order(
    State(state): State<Arc<OrdersState>>,
    caller: CallerIdentity,
    Json(payload): Json<OrderRequest>,
) -> Result<Response, AppError> {
    // 1. Resolve the effective item list (request body or cart).
    let requested: Vec<(i64, i64)> = if payload.items.is_empty() {
        let cart = state.cart_repo.find_by_user(caller.user_id).await?;
        if cart.is_empty() {
            return Ok(saga_failure(AppError::Validation("Cart is empty".to_string())));
        }
        cart.iter().map(|c| (c.product_id, c.quantity)).collect()
    } else {
        payload.items.iter().map(|i| (i.product_id, i.quantity)).collect()
    };

    // 2. Price snapshot. Nothing has mutated yet, so a lookup failure
    // simply forwards the catalog's status.
    let mut order_items = Vec::with_capacity(requested.len());
    for &(product_id, quantity) in &requested {
        match state.product_client.get_product(product_id).await {
            Ok(product) => order_items.push(NewOrderItem {
                product_id: product.id,
                quantity,
                price: product.price,
            }),
            Err(e) => {
                let status = match e {
                    AppError::Upstream { status, .. } => status,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                return Ok(saga_failure(AppError::Upstream {
                    status,
                    message: format!("Error: Product not found for id: {}", product_id),
                }));
            }
        }
    }

    // 3. Reserve inventory. On failure the catalog's status and message
    // are forwarded and no order is written. Duplicate product ids are
    // summed so the reservation covers every persisted item row.
    let mut reservation: IndexMap<i64, i64> = IndexMap::new();
    for item in &order_items {
        *reservation.entry(item.product_id).or_insert(0) += item.quantity;
    }

    if let Err(e) = state.product_client.reserve(&reservation).await {
        return Ok(saga_failure(e));
    }

    // 4. Local transaction: order + items + cart drain. A failure here
    // leaves an orphaned reservation, so compensation is attempted once.
    let total: f64 = order_items.iter().map(|item| item.price * item.quantity as f64).sum();

    let new_order = NewOrder {
        user_id: caller.user_id,
        total,
        shipping_address: payload.shipping_address,
        payment_method_id: payload.payment_method_id,
    };

    let order = match state.order_repo.create(&new_order, &order_items).await {
        Ok(order) => order,
        Err(e) => {
            warn!(
                "Order persistence failed for user {} after reserve; rolling back inventory: {}",
                caller.user_id, e
            );
            if let Err(rollback_err) = state.product_client.rollback(&reservation).await {
                error!("Orphaned reservation {:?}: rollback failed: {}", reservation, rollback_err);
            }
            return Ok(saga_failure(AppError::InternalWithMsg(
                "Failed to create order".to_string(),
            )));
        }
    };

    info!("Order {} created for user {}", order.order_id, caller.user_id);

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse::success(order.order_id, "Order created successfully")),
    )
        .into_response())
}

/// Shipping-address updates and the ACTIVE → Cancelled / Completed
/// transitions. Status input is compared case-insensitively; unknown
/// values are ignored.
pub async fn modify_order(
    State(state): State<Arc<OrdersState>>,
    caller: CallerIdentity,
    Json(payload): Json<ModifyOrderRequest>,
) -> Result<Response, AppError> {
    let mut order = state
        .order_repo
        .find_by_id(payload.order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if order.user_id != caller.user_id {
        return Ok(saga_failure(AppError::Forbidden(
            "You are not authorized to modify this order".to_string(),
        )));
    }

    if !order.is_active() {
        return Ok(saga_failure(AppError::Validation(format!(
            "Order is already {}",
            order.status
        ))));
    }

    if let Some(address) = payload.shipping_address {
        order.shipping_address = Some(address);
    }

    match payload.status.as_deref().and_then(OrderStatus::from_input) {
        Some(OrderStatus::Cancelled) => {
            if let Err(e) = cancel_with_compensation(&state, &order).await {
                let (_, message) = e.status_and_message();
                return Ok(saga_failure(AppError::InternalWithMsg(message)));
            }
            order.status = OrderStatus::Cancelled.as_str().to_string();
        }
        Some(OrderStatus::Completed) => {
            order.status = OrderStatus::Completed.as_str().to_string();
        }
        // ACTIVE, unknown values and absent status leave the state alone.
        _ => {}
    }

    let order = state.order_repo.update_order(&order).await?;

    info!("Order {} modified by user {}", order.order_id, caller.user_id);

    Ok(Json(OrderResponse::success(order.order_id, "Order modified successfully")).into_response())
}

/// Rolls the order's reservations back at the catalog, then deletes the
/// order items. The order row is only marked Cancelled by the caller once
/// both steps succeed.
async fn cancel_with_compensation(state: &OrdersState, order: &Order) -> Result<(), AppError> {
    let items = state.order_repo.items_by_order(order.order_id).await?;

    let mut reservation: IndexMap<i64, i64> = IndexMap::new();
    for item in &items {
        *reservation.entry(item.product_id).or_insert(0) += item.quantity;
    }

    if !reservation.is_empty() {
        state.product_client.rollback(&reservation).await?;
    }

    state.order_repo.delete_items_by_order(order.order_id).await?;

    info!("Order {} cancelled; inventory restored", order.order_id);
    Ok(())
}

pub async fn list_orders(
    State(state): State<Arc<OrdersState>>,
    caller: CallerIdentity,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.order_repo.list_by_user(caller.user_id).await?))
}

pub async fn get_order(
    State(state): State<Arc<OrdersState>>,
    caller: CallerIdentity,
    Path(order_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let order = state
        .order_repo
        .find_by_id(order_id)
        .await?
        .filter(|o| o.user_id == caller.user_id)
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
    Ok(Json(order))
}
