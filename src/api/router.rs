use crate::api::handlers::{auth, cart, gateway, health, order, product, user};
use crate::state::{CatalogState, GatewayState, IdentityState, OrdersState};
use axum::{
    body::Body,
    extract::Request,
    routing::{any, delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn identity_router(state: Arc<IdentityState>) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/validate", get(auth::validate))
        .route("/users/profile", get(user::profile))
        .with_state(state);

    with_trace(router)
}

pub fn catalog_router(state: Arc<CatalogState>) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_check))
        .route("/products", get(product::list_products).post(product::create_product))
        .route("/products/{id}", get(product::get_product).delete(product::delete_product))
        .route("/products/{id}/stock", put(product::update_stock))
        .route("/products/reserve", post(product::reserve_inventory))
        .route("/products/rollback", post(product::rollback_inventory))
        .with_state(state);

    with_trace(router)
}

pub fn orders_router(state: Arc<OrdersState>) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_check))
        .route("/cart/add", post(cart::add_to_cart))
        .route("/cart/remove", post(cart::remove_from_cart))
        .route("/cart", get(cart::get_cart))
        .route("/orders", post(order::create_order).get(order::list_orders))
        .route("/orders/modify", put(order::modify_order))
        .route("/orders/{id}", get(order::get_order))
        .with_state(state);

    with_trace(router)
}

/// The gateway has no fixed routes of its own: every request falls through
/// to the proxy, which consults the routing table.
pub fn gateway_router(state: Arc<GatewayState>) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_check))
        .fallback(any(gateway::proxy))
        .with_state(state);

    with_trace(router)
}

fn with_trace(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<Body>| {
                let request_id = Uuid::new_v4().to_string();
                info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = ?request.method(),
                    uri = ?request.uri(),
                    version = ?request.version(),
                    user_id = tracing::field::Empty,
                )
            })
            .on_request(|request: &Request<Body>, _span: &Span| {
                info!("started processing request: {} {}", request.method(), request.uri().path());
            })
            .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "finished processing request"
                );
            })
            .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                error!("request failed: {:?}", error);
            }),
    )
}
