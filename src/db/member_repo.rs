// src/db/member_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        indicator::{IndicatorLevel, MemberIndicators},
        member::{CreateMemberPayload, UpdateMemberPayload, Member},
    },
};

// Colunas do Member; ministry_ids vem agregado da tabela-ponte.
macro_rules! member_columns {
    () => {
        r#"
        m.id, m.full_name, m.email, m.phone, m.birth_date, m.anexo_id,
        ARRAY(
            SELECT mm.ministry_id FROM member_ministries mm
            WHERE mm.member_id = m.id
            ORDER BY mm.joined_at
        ) AS ministry_ids,
        m.attendance_level, m.fidelity_level, m.service_level,
        m.created_at, m.updated_at
        "#
    };
}

/// Qual dos três semáforos agrupar em `count_by_level`.
#[derive(Debug, Clone, Copy)]
pub enum LevelColumn {
    Attendance,
    Fidelity,
    Service,
}

// Sem pool próprio: toda consulta recebe o executor de quem chama,
// porque quase sempre roda dentro da transação de reclassificação.
#[derive(Clone, Default)]
pub struct MemberRepository;

impl MemberRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Member>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member = sqlx::query_as::<_, Member>(concat!(
            "SELECT ", member_columns!(), " FROM members m WHERE m.id = $1"
        ))
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(member)
    }

    /// Igual ao find_by_id, mas trava a linha até o fim da transação.
    /// Serializa recomputações concorrentes do mesmo membro.
    pub async fn lock_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Member>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member = sqlx::query_as::<_, Member>(concat!(
            "SELECT ", member_columns!(), " FROM members m WHERE m.id = $1 FOR UPDATE OF m"
        ))
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(member)
    }

    // Filtro por anexo é exato: membros de "todos os anexos" só aparecem sem filtro
    pub async fn list<'e, E>(&self, executor: E, anexo_id: Option<Uuid>) -> Result<Vec<Member>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let members = sqlx::query_as::<_, Member>(concat!(
            "SELECT ", member_columns!(),
            " FROM members m WHERE ($1::uuid IS NULL OR m.anexo_id = $1) ORDER BY m.full_name ASC"
        ))
            .bind(anexo_id)
            .fetch_all(executor)
            .await?;
        Ok(members)
    }

    pub async fn list_by_ministry<'e, E>(&self, executor: E, ministry_id: Uuid) -> Result<Vec<Member>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let members = sqlx::query_as::<_, Member>(concat!(
            "SELECT ", member_columns!(),
            r#" FROM members m
            JOIN member_ministries link ON link.member_id = m.id
            WHERE link.ministry_id = $1
            ORDER BY m.full_name ASC"#
        ))
            .bind(ministry_id)
            .fetch_all(executor)
            .await?;
        Ok(members)
    }

    pub async fn list_ids<'e, E>(&self, executor: E) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM members ORDER BY created_at ASC")
            .fetch_all(executor)
            .await?;
        Ok(ids)
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    pub async fn create<'e, E>(&self, executor: E, input: &CreateMemberPayload) -> Result<Member, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member = sqlx::query_as::<_, Member>(concat!(
            r#"
            WITH m AS (
                INSERT INTO members (full_name, email, phone, birth_date, anexo_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT "#, member_columns!(), " FROM m"
        ))
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.birth_date)
            .bind(input.anexo_id)
            .fetch_one(executor)
            .await
            .map_err(AppError::from_db)?;
        Ok(member)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &UpdateMemberPayload,
    ) -> Result<Option<Member>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member = sqlx::query_as::<_, Member>(concat!(
            r#"
            WITH m AS (
                UPDATE members SET
                    full_name = $2,
                    email = $3,
                    phone = $4,
                    birth_date = $5,
                    anexo_id = $6,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT "#, member_columns!(), " FROM m"
        ))
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.birth_date)
            .bind(input.anexo_id)
            .fetch_optional(executor)
            .await
            .map_err(AppError::from_db)?;
        Ok(member)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(AppError::from_db)?;
        Ok(result.rows_affected() > 0)
    }

    /// Grava apenas os três semáforos.
    pub async fn update_indicators<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        indicators: MemberIndicators,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE members SET
                attendance_level = $2,
                fidelity_level = $3,
                service_level = $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
            .bind(id)
            .bind(indicators.attendance_level)
            .bind(indicators.fidelity_level)
            .bind(indicators.service_level)
            .execute(executor)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  MINISTÉRIOS DO MEMBRO
    // =========================================================================

    // Idempotente: vincular de novo não é erro
    pub async fn add_ministry<'e, E>(&self, executor: E, member_id: Uuid, ministry_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO member_ministries (member_id, ministry_id)
            VALUES ($1, $2)
            ON CONFLICT (member_id, ministry_id) DO NOTHING
            "#,
        )
            .bind(member_id)
            .bind(ministry_id)
            .execute(executor)
            .await
            .map_err(AppError::from_db)?;
        Ok(())
    }

    pub async fn remove_ministry<'e, E>(&self, executor: E, member_id: Uuid, ministry_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM member_ministries WHERE member_id = $1 AND ministry_id = $2")
            .bind(member_id)
            .bind(ministry_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  PAINEL
    // =========================================================================

    pub async fn count_by_level<'e, E>(
        &self,
        executor: E,
        column: LevelColumn,
    ) -> Result<Vec<(IndicatorLevel, i64)>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // O nome da coluna não pode ser parâmetro; cada variante tem sua query fixa
        let sql = match column {
            LevelColumn::Attendance => "SELECT attendance_level, COUNT(*) FROM members GROUP BY 1",
            LevelColumn::Fidelity => "SELECT fidelity_level, COUNT(*) FROM members GROUP BY 1",
            LevelColumn::Service => "SELECT service_level, COUNT(*) FROM members GROUP BY 1",
        };

        let rows = sqlx::query_as::<_, (IndicatorLevel, i64)>(sql)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn count<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(executor)
            .await?;
        Ok(total)
    }
}
