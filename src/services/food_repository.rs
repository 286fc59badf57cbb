//! Record store for catalog entries, backed by SQLite.

use crate::models::food::FoodEntity;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait FoodRepository: Send + Sync {
    /// Insert or update `entity`, assigning an id when it has none.
    async fn save(&self, entity: FoodEntity) -> RepositoryResult<FoodEntity>;

    /// Every stored record, oldest first.
    async fn find_all(&self) -> RepositoryResult<Vec<FoodEntity>>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<FoodEntity>>;

    /// Cheap round-trip used by the readiness probe.
    async fn ping(&self) -> RepositoryResult<()>;
}

#[derive(Clone)]
pub struct SqliteFoodRepository {
    db: Arc<SqlitePool>,
}

impl SqliteFoodRepository {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodRepository for SqliteFoodRepository {
    async fn save(&self, entity: FoodEntity) -> RepositoryResult<FoodEntity> {
        let id = entity
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        let saved = sqlx::query_as::<_, FoodEntity>(
            r#"
            INSERT INTO foods (id, name, description, category, price, image_url)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                category = excluded.category,
                price = excluded.price,
                image_url = excluded.image_url
            RETURNING id, name, description, category, price, image_url
            "#,
        )
        .bind(&id)
        .bind(&entity.name)
        .bind(&entity.description)
        .bind(&entity.category)
        .bind(entity.price)
        .bind(&entity.image_url)
        .fetch_one(&*self.db)
        .await?;

        Ok(saved)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<FoodEntity>> {
        let rows = sqlx::query_as::<_, FoodEntity>(
            "SELECT id, name, description, category, price, image_url
             FROM foods ORDER BY rowid ASC",
        )
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<FoodEntity>> {
        let row = sqlx::query_as::<_, FoodEntity>(
            "SELECT id, name, description, category, price, image_url
             FROM foods WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&*self.db)
        .await?;
        Ok(row)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&*self.db)
            .await?;
        Ok(())
    }
}
