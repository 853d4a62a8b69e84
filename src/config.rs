use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String, // Base64-encoded HMAC key, shared across services
    pub access_ttl_minutes: i64,
    pub refresh_ttl_hours: i64,
    pub user_service_url: String,
    pub product_service_url: String,
    pub order_service_url: String,
    pub rpc_timeout_ms: u64,
    pub breaker_window: usize,
    pub breaker_failure_ratio: f64,
    pub breaker_cooldown_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://commerce.db?mode=rwc".to_string()),
            port: env::var("PORT").unwrap_or_else(|_| "8080".to_string()).parse().expect("PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set (Base64-encoded HMAC key)"),
            access_ttl_minutes: env::var("ACCESS_TOKEN_TTL_MINUTES")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .expect("ACCESS_TOKEN_TTL_MINUTES must be a number"),
            refresh_ttl_hours: env::var("REFRESH_TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "168".to_string())
                .parse()
                .expect("REFRESH_TOKEN_TTL_HOURS must be a number"),
            user_service_url: env::var("USER_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8081".to_string()),
            product_service_url: env::var("PRODUCT_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8082".to_string()),
            order_service_url: env::var("ORDER_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8083".to_string()),
            rpc_timeout_ms: env::var("RPC_TIMEOUT_MS")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("RPC_TIMEOUT_MS must be a number"),
            breaker_window: env::var("BREAKER_WINDOW")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("BREAKER_WINDOW must be a number"),
            breaker_failure_ratio: env::var("BREAKER_FAILURE_RATIO")
                .unwrap_or_else(|_| "0.5".to_string())
                .parse()
                .expect("BREAKER_FAILURE_RATIO must be a number"),
            breaker_cooldown_ms: env::var("BREAKER_COOLDOWN_MS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .expect("BREAKER_COOLDOWN_MS must be a number"),
        }
    }
}
