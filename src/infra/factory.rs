use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::circuit_breaker::{BreakerConfig, CircuitBreaker};
use crate::domain::services::token_service::TokenService;
use crate::infra::clients::http_product_client::HttpProductClient;
use crate::infra::clients::http_token_validator::HttpTokenValidator;
use crate::infra::repositories::{
    sqlite_cart_repo::SqliteCartRepo, sqlite_order_repo::SqliteOrderRepo,
    sqlite_product_repo::SqliteProductRepo, sqlite_user_repo::SqliteUserRepo,
};
use crate::state::{CatalogState, GatewayState, IdentityState, OrdersState, RouteTarget};

pub async fn connect_pool(database_url: &str) -> SqlitePool {
    info!("Initializing SQLite connection with WAL Mode...");

    let opts = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite")
}

pub async fn bootstrap_identity_state(config: &Config) -> IdentityState {
    let pool = connect_pool(&config.database_url).await;

    sqlx::migrate!("./migrations/identity")
        .run(&pool)
        .await
        .expect("Failed to run identity migrations");

    IdentityState {
        config: config.clone(),
        user_repo: Arc::new(SqliteUserRepo::new(pool)),
        token_service: Arc::new(TokenService::new(config)),
    }
}

pub async fn bootstrap_catalog_state(config: &Config) -> CatalogState {
    let pool = connect_pool(&config.database_url).await;

    sqlx::migrate!("./migrations/catalog")
        .run(&pool)
        .await
        .expect("Failed to run catalog migrations");

    CatalogState {
        config: config.clone(),
        product_repo: Arc::new(SqliteProductRepo::new(pool)),
    }
}

pub async fn bootstrap_orders_state(config: &Config) -> OrdersState {
    let pool = connect_pool(&config.database_url).await;

    sqlx::migrate!("./migrations/orders")
        .run(&pool)
        .await
        .expect("Failed to run orders migrations");

    let product_client = Arc::new(HttpProductClient::new(
        config.product_service_url.clone(),
        Duration::from_millis(config.rpc_timeout_ms),
    ));

    OrdersState {
        config: config.clone(),
        cart_repo: Arc::new(SqliteCartRepo::new(pool.clone())),
        order_repo: Arc::new(SqliteOrderRepo::new(pool)),
        product_client,
    }
}

pub fn bootstrap_gateway_state(config: &Config) -> GatewayState {
    let timeout = Duration::from_millis(config.rpc_timeout_ms);

    let routes = vec![
        RouteTarget {
            prefix: "/api/auth/",
            name: "user-service",
            base_url: config.user_service_url.clone(),
            requires_auth: false,
            fallback_message: "User Service is unavailable",
        },
        RouteTarget {
            prefix: "/api/users/",
            name: "user-service",
            base_url: config.user_service_url.clone(),
            requires_auth: true,
            fallback_message: "User Service is unavailable",
        },
        RouteTarget {
            prefix: "/api/products",
            name: "product-service",
            base_url: config.product_service_url.clone(),
            requires_auth: true,
            fallback_message: "Product Service is unavailable",
        },
        RouteTarget {
            prefix: "/api/orders",
            name: "order-service",
            base_url: config.order_service_url.clone(),
            requires_auth: true,
            fallback_message: "Order Service is unavailable",
        },
        RouteTarget {
            prefix: "/api/cart",
            name: "order-service",
            base_url: config.order_service_url.clone(),
            requires_auth: true,
            fallback_message: "Order Service is unavailable",
        },
    ];

    let breaker_config = BreakerConfig {
        window: config.breaker_window,
        failure_ratio: config.breaker_failure_ratio,
        cooldown: Duration::from_millis(config.breaker_cooldown_ms),
    };

    let mut breakers = HashMap::new();
    for name in ["user-service", "product-service", "order-service"] {
        breakers.insert(name, CircuitBreaker::new(breaker_config.clone()));
    }

    GatewayState {
        config: config.clone(),
        http: reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build gateway HTTP client"),
        validator: Arc::new(HttpTokenValidator::new(config.user_service_url.clone(), timeout)),
        routes,
        breakers: Arc::new(breakers),
    }
}
