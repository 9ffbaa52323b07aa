// src/db/intercession_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::intercession::{CreateIntercessionLogPayload, IntercessionLog},
};

#[derive(Clone)]
pub struct IntercessionRepository {
    pool: PgPool,
}

impl IntercessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Registro duplicado (mesmo membro, tipo e data) cai na uq_intercession_log
    pub async fn create<'e, E>(&self, executor: E, input: &CreateIntercessionLogPayload) -> Result<IntercessionLog, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, IntercessionLog>(
            r#"
            INSERT INTO intercession_logs (member_id, log_type, log_date)
            VALUES ($1, $2, $3)
            RETURNING id, member_id, log_type, log_date, created_at
            "#,
        )
            .bind(input.member_id)
            .bind(input.log_type)
            .bind(input.log_date)
            .fetch_one(executor)
            .await
            .map_err(AppError::from_db)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<IntercessionLog>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deleted = sqlx::query_as::<_, IntercessionLog>(
            r#"
            DELETE FROM intercession_logs
            WHERE id = $1
            RETURNING id, member_id, log_type, log_date, created_at
            "#,
        )
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(deleted)
    }

    pub async fn list(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Vec<IntercessionLog>, AppError> {
        let logs = sqlx::query_as::<_, IntercessionLog>(
            r#"
            SELECT id, member_id, log_type, log_date, created_at
            FROM intercession_logs
            WHERE ($1::date IS NULL OR log_date >= $1)
              AND ($2::date IS NULL OR log_date <= $2)
            ORDER BY log_date DESC, created_at DESC
            "#,
        )
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(logs)
    }

    pub async fn list_by_member<'e, E>(&self, executor: E, member_id: Uuid) -> Result<Vec<IntercessionLog>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let logs = sqlx::query_as::<_, IntercessionLog>(
            r#"
            SELECT id, member_id, log_type, log_date, created_at
            FROM intercession_logs
            WHERE member_id = $1
            "#,
        )
            .bind(member_id)
            .fetch_all(executor)
            .await?;
        Ok(logs)
    }
}
