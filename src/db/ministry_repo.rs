// src/db/ministry_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::ministry::{CreateMinistryPayload, Ministry},
};

#[derive(Clone)]
pub struct MinistryRepository {
    pool: PgPool,
}

impl MinistryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &CreateMinistryPayload) -> Result<Ministry, AppError> {
        sqlx::query_as::<_, Ministry>(
            r#"
            INSERT INTO ministries (name, description, anexo_id, leader_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, anexo_id, leader_id, created_at
            "#,
        )
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.anexo_id)
            .bind(input.leader_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_db)
    }

    pub async fn list(&self) -> Result<Vec<Ministry>, AppError> {
        let ministries = sqlx::query_as::<_, Ministry>(
            r#"
            SELECT id, name, description, anexo_id, leader_id, created_at
            FROM ministries
            ORDER BY name ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;
        Ok(ministries)
    }

    pub async fn exists<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM ministries WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }
}
