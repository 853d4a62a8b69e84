pub mod sqlite_cart_repo;
pub mod sqlite_order_repo;
pub mod sqlite_product_repo;
pub mod sqlite_user_repo;
