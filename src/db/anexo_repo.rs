// src/db/anexo_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::anexo::Anexo};

#[derive(Clone)]
pub struct AnexoRepository {
    pool: PgPool,
}

impl AnexoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str, address: Option<&str>) -> Result<Anexo, AppError> {
        sqlx::query_as::<_, Anexo>(
            r#"
            INSERT INTO anexos (name, address)
            VALUES ($1, $2)
            RETURNING id, name, address, created_at
            "#,
        )
            .bind(name)
            .bind(address)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_db)
    }

    pub async fn list(&self) -> Result<Vec<Anexo>, AppError> {
        let anexos = sqlx::query_as::<_, Anexo>(
            "SELECT id, name, address, created_at FROM anexos ORDER BY name ASC",
        )
            .fetch_all(&self.pool)
            .await?;
        Ok(anexos)
    }
}
