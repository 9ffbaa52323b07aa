// src/db/finance_repo.rs

use sqlx::{PgPool, Postgres, Executor};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::finance::{CreateTransactionPayload, FinanceTransaction},
};

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, input: &CreateTransactionPayload) -> Result<FinanceTransaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, FinanceTransaction>(
            r#"
            INSERT INTO finance_transactions (
                member_id, amount, transaction_type, transaction_date, description
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, member_id, amount, transaction_type,
                transaction_date, description, created_at
            "#,
        )
            .bind(input.member_id)
            .bind(input.amount)
            .bind(input.transaction_type)
            .bind(input.transaction_date)
            .bind(&input.description)
            .fetch_one(executor)
            .await
            .map_err(AppError::from_db)?;

        Ok(transaction)
    }

    pub async fn list(&self, member_id: Option<Uuid>) -> Result<Vec<FinanceTransaction>, AppError> {
        let transactions = sqlx::query_as::<_, FinanceTransaction>(
            r#"
            SELECT
                id, member_id, amount, transaction_type,
                transaction_date, description, created_at
            FROM finance_transactions
            WHERE ($1::uuid IS NULL OR member_id = $1)
            ORDER BY transaction_date DESC, created_at DESC
            "#,
        )
            .bind(member_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(transactions)
    }

    pub async fn list_by_member<'e, E>(
        &self,
        executor: E,
        member_id: Uuid,
    ) -> Result<Vec<FinanceTransaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transactions = sqlx::query_as::<_, FinanceTransaction>(
            r#"
            SELECT
                id, member_id, amount, transaction_type,
                transaction_date, description, created_at
            FROM finance_transactions
            WHERE member_id = $1
            "#,
        )
            .bind(member_id)
            .fetch_all(executor)
            .await?;

        Ok(transactions)
    }

    // Devolve a linha apagada para o serviço saber qual membro reclassificar
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<FinanceTransaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deleted = sqlx::query_as::<_, FinanceTransaction>(
            r#"
            DELETE FROM finance_transactions
            WHERE id = $1
            RETURNING
                id, member_id, amount, transaction_type,
                transaction_date, description, created_at
            "#,
        )
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(deleted)
    }
}
