use crate::config::Config;
use crate::domain::ports::{
    CartRepository, OrderRepository, ProductClient, ProductRepository, TokenValidator, UserRepository,
};
use crate::domain::services::circuit_breaker::CircuitBreaker;
use crate::domain::services::token_service::TokenService;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct IdentityState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub token_service: Arc<TokenService>,
}

#[derive(Clone)]
pub struct CatalogState {
    pub config: Config,
    pub product_repo: Arc<dyn ProductRepository>,
}

#[derive(Clone)]
pub struct OrdersState {
    pub config: Config,
    pub cart_repo: Arc<dyn CartRepository>,
    pub order_repo: Arc<dyn OrderRepository>,
    pub product_client: Arc<dyn ProductClient>,
}

/// One entry of the gateway routing table (longest prefix wins).
#[derive(Clone)]
pub struct RouteTarget {
    pub prefix: &'static str,
    pub name: &'static str,
    pub base_url: String,
    pub requires_auth: bool,
    pub fallback_message: &'static str,
}

#[derive(Clone)]
pub struct GatewayState {
    pub config: Config,
    pub http: reqwest::Client,
    pub validator: Arc<dyn TokenValidator>,
    pub routes: Vec<RouteTarget>,
    pub breakers: Arc<HashMap<&'static str, CircuitBreaker>>,
}
