use crate::domain::models::order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
use crate::domain::ports::OrderRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteOrderRepo {
    pool: SqlitePool,
}

impl SqliteOrderRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepo {
    // Order row, its items and the cart drain commit or fail together;
    // the caller compensates the catalog reservation on failure.
    async fn create(&self, order: &NewOrder, items: &[NewOrderItem]) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (user_id, total, status, shipping_address, payment_method_id) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING order_id, user_id, total, status, shipping_address, payment_method_id, created_at",
        )
            .bind(order.user_id)
            .bind(order.total)
            .bind(OrderStatus::Active.as_str())
            .bind(&order.shipping_address)
            .bind(&order.payment_method_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for item in items {
            sqlx::query("INSERT INTO order_items (order_id, product_id, quantity, price) VALUES (?, ?, ?, ?)")
                .bind(created.order_id)
                .bind(item.product_id)
                .bind(item.quantity)
                .bind(item.price)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
            .bind(order.user_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(created)
    }

    async fn find_by_id(&self, order_id: i64) -> Result<Option<Order>, AppError> {
        sqlx::query_as::<_, Order>(
            "SELECT order_id, user_id, total, status, shipping_address, payment_method_id, created_at \
             FROM orders WHERE order_id = ?",
        )
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Order>, AppError> {
        sqlx::query_as::<_, Order>(
            "SELECT order_id, user_id, total, status, shipping_address, payment_method_id, created_at \
             FROM orders WHERE user_id = ? ORDER BY order_id ASC",
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn items_by_order(&self, order_id: i64) -> Result<Vec<OrderItem>, AppError> {
        sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, quantity, price FROM order_items WHERE order_id = ? ORDER BY id ASC",
        )
            .bind(order_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_order(&self, order: &Order) -> Result<Order, AppError> {
        sqlx::query_as::<_, Order>(
            "UPDATE orders SET status = ?, shipping_address = ? WHERE order_id = ? \
             RETURNING order_id, user_id, total, status, shipping_address, payment_method_id, created_at",
        )
            .bind(&order.status)
            .bind(&order.shipping_address)
            .bind(order.order_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_items_by_order(&self, order_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM order_items WHERE order_id = ?")
            .bind(order_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
