pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod state;

use crate::config::Config;
use crate::infra::factory::{
    bootstrap_catalog_state, bootstrap_gateway_state, bootstrap_identity_state, bootstrap_orders_state,
};
use api::router::{catalog_router, gateway_router, identity_router, orders_router};
use axum::Router;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn init_logging(service: &str) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("./logs", format!("{}.log", service));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("info,commerce_backend=debug"));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .pretty()
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized. Writing JSON logs to ./logs/");
    guard
}

pub async fn run_user_service() {
    let _guard = init_logging("user-service");
    let config = Config::from_env();
    let state = Arc::new(bootstrap_identity_state(&config).await);
    serve(identity_router(state), &config, "user-service").await;
}

pub async fn run_product_service() {
    let _guard = init_logging("product-service");
    let config = Config::from_env();
    let state = Arc::new(bootstrap_catalog_state(&config).await);
    serve(catalog_router(state), &config, "product-service").await;
}

pub async fn run_order_service() {
    let _guard = init_logging("order-service");
    let config = Config::from_env();
    let state = Arc::new(bootstrap_orders_state(&config).await);
    serve(orders_router(state), &config, "order-service").await;
}

pub async fn run_gateway() {
    let _guard = init_logging("gateway");
    let config = Config::from_env();
    let state = Arc::new(bootstrap_gateway_state(&config));
    serve(gateway_router(state), &config, "gateway").await;
}

async fn serve(app: Router, config: &Config, service: &str) {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("Failed to bind port");

    info!("🚀 {} running on port {}", service, config.port);
    axum::serve(listener, app).await.expect("Server error");
}
