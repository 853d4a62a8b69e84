use crate::domain::models::product::Product;
use crate::domain::ports::{ProductRepository, ReserveOutcome};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteProductRepo {
    pool: SqlitePool,
}

impl SqliteProductRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepo {
    async fn create(&self, name: &str, price: f64, stock: i64) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, price, stock) VALUES (?, ?, ?) RETURNING id, name, price, stock",
        )
            .bind(name)
            .bind(price)
            .bind(stock)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>("SELECT id, name, price, stock FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Product>, AppError> {
        sqlx::query_as::<_, Product>("SELECT id, name, price, stock FROM products ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_stock(&self, id: i64, stock: i64) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(
            "UPDATE products SET stock = ? WHERE id = ? RETURNING id, name, price, stock",
        )
            .bind(stock)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    // The conditional UPDATE is the serialization point: concurrent
    // reservers race on the row, but stock can never go negative.
    async fn try_reserve(&self, id: i64, quantity: i64) -> Result<ReserveOutcome, AppError> {
        let result = sqlx::query("UPDATE products SET stock = stock - ?1 WHERE id = ?2 AND stock >= ?1")
            .bind(quantity)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 1 {
            return Ok(ReserveOutcome::Reserved);
        }

        match self.find_by_id(id).await? {
            Some(_) => Ok(ReserveOutcome::InsufficientStock),
            None => Ok(ReserveOutcome::NotFound),
        }
    }

    async fn restock(&self, id: i64, quantity: i64) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE products SET stock = stock + ? WHERE id = ?")
            .bind(quantity)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() == 1)
    }
}
