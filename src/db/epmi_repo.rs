// src/db/epmi_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::epmi::{EpmiEnrollment, EpmiStatus},
};

#[derive(Clone)]
pub struct EpmiRepository {
    pool: PgPool,
}

impl EpmiRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Uma matrícula por membro e ciclo (uq_epmi_member_cycle)
    pub async fn enroll<'e, E>(&self, executor: E, member_id: Uuid, cycle: &str) -> Result<EpmiEnrollment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, EpmiEnrollment>(
            r#"
            INSERT INTO epmi_enrollments (member_id, cycle)
            VALUES ($1, $2)
            RETURNING id, member_id, status, cycle, enrolled_at
            "#,
        )
            .bind(member_id)
            .bind(cycle)
            .fetch_one(executor)
            .await
            .map_err(AppError::from_db)
    }

    pub async fn update_status<'e, E>(&self, executor: E, id: Uuid, status: EpmiStatus) -> Result<Option<EpmiEnrollment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let enrollment = sqlx::query_as::<_, EpmiEnrollment>(
            r#"
            UPDATE epmi_enrollments SET status = $2
            WHERE id = $1
            RETURNING id, member_id, status, cycle, enrolled_at
            "#,
        )
            .bind(id)
            .bind(status)
            .fetch_optional(executor)
            .await?;
        Ok(enrollment)
    }

    pub async fn list(&self) -> Result<Vec<EpmiEnrollment>, AppError> {
        let enrollments = sqlx::query_as::<_, EpmiEnrollment>(
            r#"
            SELECT id, member_id, status, cycle, enrolled_at
            FROM epmi_enrollments
            ORDER BY cycle DESC, enrolled_at ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;
        Ok(enrollments)
    }

    pub async fn list_by_member<'e, E>(&self, executor: E, member_id: Uuid) -> Result<Vec<EpmiEnrollment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let enrollments = sqlx::query_as::<_, EpmiEnrollment>(
            "SELECT id, member_id, status, cycle, enrolled_at FROM epmi_enrollments WHERE member_id = $1",
        )
            .bind(member_id)
            .fetch_all(executor)
            .await?;
        Ok(enrollments)
    }
}
