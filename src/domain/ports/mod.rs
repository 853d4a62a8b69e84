use crate::domain::models::{
    auth::UserContext,
    cart::CartItem,
    order::{NewOrder, NewOrderItem, Order, OrderItem},
    product::Product,
    user::{NewUser, User},
};
use crate::error::AppError;
use async_trait::async_trait;
use indexmap::IndexMap;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &NewUser) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
}

/// Outcome of an atomic conditional stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    Reserved,
    InsufficientStock,
    NotFound,
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, name: &str, price: f64, stock: i64) -> Result<Product, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError>;
    async fn list(&self) -> Result<Vec<Product>, AppError>;
    async fn set_stock(&self, id: i64, stock: i64) -> Result<Option<Product>, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
    /// Decrements stock only when `stock >= quantity`, in a single
    /// conditional UPDATE so concurrent reservers can never oversell.
    async fn try_reserve(&self, id: i64, quantity: i64) -> Result<ReserveOutcome, AppError>;
    /// Unconditional restock. Returns false when the product is missing.
    async fn restock(&self, id: i64, quantity: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<CartItem>, AppError>;
    async fn find_by_user_and_product(&self, user_id: i64, product_id: i64) -> Result<Option<CartItem>, AppError>;
    async fn insert(&self, user_id: i64, product_id: i64, quantity: i64, price: f64) -> Result<CartItem, AppError>;
    async fn update_quantity(&self, id: i64, quantity: i64) -> Result<(), AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts the order and its items and drains the user's cart in one
    /// local transaction.
    async fn create(&self, order: &NewOrder, items: &[NewOrderItem]) -> Result<Order, AppError>;
    async fn find_by_id(&self, order_id: i64) -> Result<Option<Order>, AppError>;
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Order>, AppError>;
    async fn items_by_order(&self, order_id: i64) -> Result<Vec<OrderItem>, AppError>;
    async fn update_order(&self, order: &Order) -> Result<Order, AppError>;
    async fn delete_items_by_order(&self, order_id: i64) -> Result<(), AppError>;
}

/// Order-service view of the product-service. Failures carry the upstream
/// status and message so the saga can forward them verbatim.
#[async_trait]
pub trait ProductClient: Send + Sync {
    async fn get_product(&self, product_id: i64) -> Result<Product, AppError>;
    async fn reserve(&self, items: &IndexMap<i64, i64>) -> Result<(), AppError>;
    async fn rollback(&self, items: &IndexMap<i64, i64>) -> Result<(), AppError>;
}

/// Gateway-side token validation callback against the user-service.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<UserContext, AppError>;
}
