use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose, Engine as _};
use commerce_backend::{
    api::router::{catalog_router, gateway_router, identity_router, orders_router},
    config::Config,
    domain::services::circuit_breaker::{BreakerConfig, CircuitBreaker},
    domain::services::token_service::TokenService,
    infra::clients::{http_product_client::HttpProductClient, http_token_validator::HttpTokenValidator},
    infra::repositories::{
        sqlite_cart_repo::SqliteCartRepo, sqlite_order_repo::SqliteOrderRepo,
        sqlite_product_repo::SqliteProductRepo, sqlite_user_repo::SqliteUserRepo,
    },
    state::{CatalogState, GatewayState, IdentityState, OrdersState, RouteTarget},
};
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// The four services wired together: identity, catalog and orders run on
/// ephemeral ports so the gateway (and the order saga) can reach them over
/// real HTTP; the gateway router itself is driven with oneshot.
#[allow(dead_code)]
pub struct TestStack {
    pub gateway: Router,
    pub identity_app: Router,
    pub catalog_app: Router,
    pub orders_app: Router,
    pub identity: Arc<IdentityState>,
    pub catalog: Arc<CatalogState>,
    pub orders: Arc<OrdersState>,
    pub identity_pool: Pool<Sqlite>,
    pub catalog_pool: Pool<Sqlite>,
    pub orders_pool: Pool<Sqlite>,
    pub user_service_url: String,
    pub product_service_url: String,
    pub order_service_url: String,
    db_files: Vec<String>,
}

fn test_config(db_url: &str, jwt_secret: &str) -> Config {
    Config {
        database_url: db_url.to_string(),
        port: 0,
        jwt_secret: jwt_secret.to_string(),
        access_ttl_minutes: 15,
        refresh_ttl_hours: 168,
        user_service_url: String::new(),
        product_service_url: String::new(),
        order_service_url: String::new(),
        rpc_timeout_ms: 2000,
        breaker_window: 3,
        breaker_failure_ratio: 1.0,
        breaker_cooldown_ms: 60_000,
    }
}

async fn test_pool(db_filename: &str) -> Pool<Sqlite> {
    let db_url = format!("sqlite://{}?mode=rwc", db_filename);
    let connection_options = SqliteConnectOptions::from_str(&db_url)
        .unwrap()
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .connect_with(connection_options)
        .await
        .expect("Failed to connect to test db")
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

fn gateway_routes(user_url: &str, product_url: &str, order_url: &str) -> Vec<RouteTarget> {
    vec![
        RouteTarget {
            prefix: "/api/auth/",
            name: "user-service",
            base_url: user_url.to_string(),
            requires_auth: false,
            fallback_message: "User Service is unavailable",
        },
        RouteTarget {
            prefix: "/api/users/",
            name: "user-service",
            base_url: user_url.to_string(),
            requires_auth: true,
            fallback_message: "User Service is unavailable",
        },
        RouteTarget {
            prefix: "/api/products",
            name: "product-service",
            base_url: product_url.to_string(),
            requires_auth: true,
            fallback_message: "Product Service is unavailable",
        },
        RouteTarget {
            prefix: "/api/orders",
            name: "order-service",
            base_url: order_url.to_string(),
            requires_auth: true,
            fallback_message: "Order Service is unavailable",
        },
        RouteTarget {
            prefix: "/api/cart",
            name: "order-service",
            base_url: order_url.to_string(),
            requires_auth: true,
            fallback_message: "Order Service is unavailable",
        },
    ]
}

fn gateway_breakers(config: &Config) -> Arc<HashMap<&'static str, CircuitBreaker>> {
    let breaker_config = BreakerConfig {
        window: config.breaker_window,
        failure_ratio: config.breaker_failure_ratio,
        cooldown: Duration::from_millis(config.breaker_cooldown_ms),
    };

    let mut breakers = HashMap::new();
    for name in ["user-service", "product-service", "order-service"] {
        breakers.insert(name, CircuitBreaker::new(breaker_config.clone()));
    }
    Arc::new(breakers)
}

impl TestStack {
    pub async fn new() -> Self {
        let jwt_secret = general_purpose::STANDARD.encode(b"integration-test-signing-secret-0123");

        let identity_db = format!("test_{}.db", Uuid::new_v4());
        let catalog_db = format!("test_{}.db", Uuid::new_v4());
        let orders_db = format!("test_{}.db", Uuid::new_v4());

        let identity_pool = test_pool(&identity_db).await;
        let catalog_pool = test_pool(&catalog_db).await;
        let orders_pool = test_pool(&orders_db).await;

        sqlx::migrate!("./migrations/identity")
            .run(&identity_pool)
            .await
            .expect("Failed to migrate identity test db");
        sqlx::migrate!("./migrations/catalog")
            .run(&catalog_pool)
            .await
            .expect("Failed to migrate catalog test db");
        sqlx::migrate!("./migrations/orders")
            .run(&orders_pool)
            .await
            .expect("Failed to migrate orders test db");

        let identity_config = test_config(&identity_db, &jwt_secret);
        let identity = Arc::new(IdentityState {
            config: identity_config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(identity_pool.clone())),
            token_service: Arc::new(TokenService::new(&identity_config)),
        });

        let catalog = Arc::new(CatalogState {
            config: test_config(&catalog_db, &jwt_secret),
            product_repo: Arc::new(SqliteProductRepo::new(catalog_pool.clone())),
        });

        let identity_app = identity_router(identity.clone());
        let catalog_app = catalog_router(catalog.clone());

        let user_service_url = spawn(identity_app.clone()).await;
        let product_service_url = spawn(catalog_app.clone()).await;

        let timeout = Duration::from_millis(2000);
        let mut orders_config = test_config(&orders_db, &jwt_secret);
        orders_config.product_service_url = product_service_url.clone();
        let orders = Arc::new(OrdersState {
            config: orders_config,
            cart_repo: Arc::new(SqliteCartRepo::new(orders_pool.clone())),
            order_repo: Arc::new(SqliteOrderRepo::new(orders_pool.clone())),
            product_client: Arc::new(HttpProductClient::new(product_service_url.clone(), timeout)),
        });

        let orders_app = orders_router(orders.clone());
        let order_service_url = spawn(orders_app.clone()).await;

        let mut gateway_config = test_config("unused.db", &jwt_secret);
        gateway_config.user_service_url = user_service_url.clone();
        gateway_config.product_service_url = product_service_url.clone();
        gateway_config.order_service_url = order_service_url.clone();

        let gateway_state = Arc::new(GatewayState {
            config: gateway_config.clone(),
            http: reqwest::Client::builder().timeout(timeout).build().unwrap(),
            validator: Arc::new(HttpTokenValidator::new(user_service_url.clone(), timeout)),
            routes: gateway_routes(&user_service_url, &product_service_url, &order_service_url),
            breakers: gateway_breakers(&gateway_config),
        });
        let gateway = gateway_router(gateway_state);

        Self {
            gateway,
            identity_app,
            catalog_app,
            orders_app,
            identity,
            catalog,
            orders,
            identity_pool,
            catalog_pool,
            orders_pool,
            user_service_url,
            product_service_url,
            order_service_url,
            db_files: vec![identity_db, catalog_db, orders_db],
        }
    }

    /// A second gateway whose product-service route points at a closed port.
    /// Fresh breakers, same identity backend, so authentication still works.
    #[allow(dead_code)]
    pub fn gateway_with_dead_products(&self) -> Router {
        self.gateway_with_products_at("http://127.0.0.1:1", 60_000)
    }

    /// A gateway whose product-service route and breaker cooldown the test
    /// controls, for breaker recovery scenarios.
    #[allow(dead_code)]
    pub fn gateway_with_products_at(&self, product_url: &str, cooldown_ms: u64) -> Router {
        let timeout = Duration::from_millis(500);

        let mut config = self.identity.config.clone();
        config.user_service_url = self.user_service_url.clone();
        config.product_service_url = product_url.to_string();
        config.order_service_url = self.order_service_url.clone();
        config.breaker_cooldown_ms = cooldown_ms;

        let state = Arc::new(GatewayState {
            config: config.clone(),
            http: reqwest::Client::builder().timeout(timeout).build().unwrap(),
            validator: Arc::new(HttpTokenValidator::new(
                self.user_service_url.clone(),
                Duration::from_millis(2000),
            )),
            routes: gateway_routes(&self.user_service_url, product_url, &self.order_service_url),
            breakers: gateway_breakers(&config),
        });
        gateway_router(state)
    }

    #[allow(dead_code)]
    pub async fn register_and_login(&self, username: &str) -> AuthTokens {
        let payload = serde_json::json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password123"
        });

        let (status, _) = send(&self.gateway, Method::POST, "/api/auth/register", None, Some(payload)).await;
        assert!(status.is_success(), "Registration failed in test helper: status {}", status);

        let login = serde_json::json!({ "username": username, "password": "password123" });
        let (status, body) = send(&self.gateway, Method::POST, "/api/auth/login", None, Some(login)).await;
        assert!(status.is_success(), "Login failed in test helper: status {}", status);

        AuthTokens {
            access_token: body["accessToken"].as_str().expect("No accessToken in body").to_string(),
            refresh_token: body["refreshToken"].as_str().expect("No refreshToken in body").to_string(),
        }
    }

    #[allow(dead_code)]
    pub async fn seed_product(&self, name: &str, price: f64, stock: i64) -> i64 {
        self.catalog
            .product_repo
            .create(name, price, stock)
            .await
            .expect("Failed to seed product")
            .id
    }

    #[allow(dead_code)]
    pub async fn product_stock(&self, id: i64) -> i64 {
        self.catalog
            .product_repo
            .find_by_id(id)
            .await
            .expect("Failed to read product")
            .expect("Product missing")
            .stock
    }
}

impl Drop for TestStack {
    fn drop(&mut self) {
        for file in &self.db_files {
            let _ = std::fs::remove_file(file);
            let _ = std::fs::remove_file(format!("{}-wal", file));
            let _ = std::fs::remove_file(format!("{}-shm", file));
        }
    }
}

#[allow(dead_code)]
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Direct-to-backend request carrying the identity headers the gateway
/// would normally inject.
#[allow(dead_code)]
pub async fn send_as_user(
    router: &Router,
    method: Method,
    uri: &str,
    user_id: i64,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-User-ID", user_id.to_string())
        .header("X-User-Name", format!("user{}", user_id))
        .header("X-User-Roles", "ROLE_USER");

    let request = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            builder.body(Body::from(json.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}
