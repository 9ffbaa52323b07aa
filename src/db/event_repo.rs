// src/db/event_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::event::{AttendanceMark, CreateEventPayload, Event},
};

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  EVENTOS
    // =========================================================================

    pub async fn create(&self, input: &CreateEventPayload) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, event_type, event_date, anexo_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, event_type, event_date, anexo_id, created_at
            "#,
        )
            .bind(&input.title)
            .bind(input.event_type)
            .bind(input.event_date)
            .bind(input.anexo_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_db)
    }

    pub async fn list(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, event_type, event_date, anexo_id, created_at
            FROM events
            WHERE ($1::date IS NULL OR event_date >= $1)
              AND ($2::date IS NULL OR event_date <= $2)
            ORDER BY event_date DESC, created_at DESC, id DESC
            "#,
        )
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM events WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Cultos e aulas visíveis para um membro do anexo informado.
    /// `anexo_id = None` (membro de todos os anexos) só casa com eventos gerais.
    pub async fn list_attendance_events<'e, E>(
        &self,
        executor: E,
        anexo_id: Option<Uuid>,
    ) -> Result<Vec<Event>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, event_type, event_date, anexo_id, created_at
            FROM events
            WHERE event_type IN ('SERVICE', 'CLASS_COURSE')
              AND (anexo_id IS NULL OR anexo_id = $1)
            ORDER BY event_date DESC, created_at DESC, id DESC
            "#,
        )
            .bind(anexo_id)
            .fetch_all(executor)
            .await?;
        Ok(events)
    }

    // =========================================================================
    //  PRESENÇA
    // =========================================================================

    pub async fn list_attendance(&self, event_id: Uuid) -> Result<Vec<AttendanceMark>, AppError> {
        let marks = sqlx::query_as::<_, AttendanceMark>(
            "SELECT event_id, member_id, present FROM attendance WHERE event_id = $1",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(marks)
    }

    pub async fn list_member_attendance<'e, E>(
        &self,
        executor: E,
        member_id: Uuid,
    ) -> Result<Vec<AttendanceMark>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let marks = sqlx::query_as::<_, AttendanceMark>(
            "SELECT event_id, member_id, present FROM attendance WHERE member_id = $1",
        )
            .bind(member_id)
            .fetch_all(executor)
            .await?;
        Ok(marks)
    }

    // UPSERT: marcar de novo sobrescreve
    pub async fn set_attendance<'e, E>(
        &self,
        executor: E,
        event_id: Uuid,
        member_id: Uuid,
        present: bool,
    ) -> Result<AttendanceMark, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AttendanceMark>(
            r#"
            INSERT INTO attendance (event_id, member_id, present)
            VALUES ($1, $2, $3)
            ON CONFLICT (event_id, member_id)
            DO UPDATE SET present = EXCLUDED.present, recorded_at = NOW()
            RETURNING event_id, member_id, present
            "#,
        )
            .bind(event_id)
            .bind(member_id)
            .bind(present)
            .fetch_one(executor)
            .await
            .map_err(AppError::from_db)
    }

    pub async fn clear_attendance<'e, E>(&self, executor: E, event_id: Uuid, member_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM attendance WHERE event_id = $1 AND member_id = $2")
            .bind(event_id)
            .bind(member_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
