use crate::domain::models::cart::CartItem;
use crate::domain::ports::CartRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCartRepo {
    pool: SqlitePool,
}

impl SqliteCartRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for SqliteCartRepo {
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<CartItem>, AppError> {
        sqlx::query_as::<_, CartItem>(
            "SELECT id, user_id, product_id, quantity, price FROM cart_items WHERE user_id = ? ORDER BY id ASC",
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    // Duplicate rows for the same (user, product) are treated as one
    // logical entry: the first row wins.
    async fn find_by_user_and_product(&self, user_id: i64, product_id: i64) -> Result<Option<CartItem>, AppError> {
        sqlx::query_as::<_, CartItem>(
            "SELECT id, user_id, product_id, quantity, price FROM cart_items WHERE user_id = ? AND product_id = ? ORDER BY id ASC LIMIT 1",
        )
            .bind(user_id)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn insert(&self, user_id: i64, product_id: i64, quantity: i64, price: f64) -> Result<CartItem, AppError> {
        sqlx::query_as::<_, CartItem>(
            "INSERT INTO cart_items (user_id, product_id, quantity, price) VALUES (?, ?, ?, ?) RETURNING id, user_id, product_id, quantity, price",
        )
            .bind(user_id)
            .bind(product_id)
            .bind(quantity)
            .bind(price)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_quantity(&self, id: i64, quantity: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE cart_items SET quantity = ? WHERE id = ?")
            .bind(quantity)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM cart_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
