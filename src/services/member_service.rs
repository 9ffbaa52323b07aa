// src/services/member_service.rs

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MemberRepository, MinistryRepository},
    models::member::{CreateMemberPayload, Member, UpdateMemberPayload},
    services::indicator_service::IndicatorService,
};

// A única FK de members é o anexo
fn anexo_reference(e: AppError) -> AppError {
    match e {
        AppError::ForeignKeyViolation(_) => AppError::AnexoNotFound,
        other => other,
    }
}

#[derive(Clone)]
pub struct MemberService {
    repo: MemberRepository,
    ministry_repo: MinistryRepository,
    indicators: IndicatorService,
    pool: PgPool,
}

impl MemberService {
    pub fn new(
        repo: MemberRepository,
        ministry_repo: MinistryRepository,
        indicators: IndicatorService,
        pool: PgPool,
    ) -> Self {
        Self { repo, ministry_repo, indicators, pool }
    }

    // =========================================================================
    //  CADASTRO
    // =========================================================================

    /// Cria o membro e já calcula os semáforos iniciais, na mesma transação.
    pub async fn create_member(&self, input: &CreateMemberPayload) -> Result<Member, AppError> {
        let mut tx = self.pool.begin().await?;

        let member = self.repo
            .create(&mut *tx, input)
            .await
            .map_err(anexo_reference)?;

        let member = self.indicators
            .refresh_in(&mut tx, member.id)
            .await?
            .map(|r| r.into_member())
            .unwrap_or(member);

        tx.commit().await?;
        tracing::info!(member_id = %member.id, "membro cadastrado");
        Ok(member)
    }

    pub async fn get_member(&self, id: Uuid) -> Result<Member, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::MemberNotFound)
    }

    pub async fn list_members(&self, anexo_id: Option<Uuid>) -> Result<Vec<Member>, AppError> {
        self.repo.list(&self.pool, anexo_id).await
    }

    pub async fn list_ministry_members(&self, ministry_id: Uuid) -> Result<Vec<Member>, AppError> {
        if !self.ministry_repo.exists(&self.pool, ministry_id).await? {
            return Err(AppError::MinistryNotFound);
        }
        self.repo.list_by_ministry(&self.pool, ministry_id).await
    }

    /// Mudar de anexo muda quais cultos contam, por isso reclassifica.
    pub async fn update_member(&self, id: Uuid, input: &UpdateMemberPayload) -> Result<Member, AppError> {
        let mut tx = self.pool.begin().await?;

        self.repo
            .update(&mut *tx, id, input)
            .await
            .map_err(anexo_reference)?
            .ok_or(AppError::MemberNotFound)?;

        let member = self.reclassify_in(&mut tx, id).await?;
        tx.commit().await?;
        Ok(member)
    }

    pub async fn delete_member(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(&self.pool, id).await? {
            return Err(AppError::MemberNotFound);
        }
        tracing::info!(member_id = %id, "membro removido");
        Ok(())
    }

    // =========================================================================
    //  MINISTÉRIOS
    // =========================================================================

    pub async fn join_ministry(&self, member_id: Uuid, ministry_id: Uuid) -> Result<Member, AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava o membro antes de inserir o vínculo que o referencia
        self.indicators
            .lock_member(&mut tx, member_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;
        if !self.ministry_repo.exists(&mut *tx, ministry_id).await? {
            return Err(AppError::MinistryNotFound);
        }

        self.repo.add_ministry(&mut *tx, member_id, ministry_id).await?;
        let member = self.reclassify_in(&mut tx, member_id).await?;

        tx.commit().await?;
        Ok(member)
    }

    pub async fn leave_ministry(&self, member_id: Uuid, ministry_id: Uuid) -> Result<Member, AppError> {
        let mut tx = self.pool.begin().await?;

        if !self.repo.remove_ministry(&mut *tx, member_id, ministry_id).await? {
            // Sem vínculo: o membro pode nem existir
            if self.repo.find_by_id(&mut *tx, member_id).await?.is_none() {
                return Err(AppError::MemberNotFound);
            }
            return Err(AppError::MinistryNotFound);
        }

        let member = self.reclassify_in(&mut tx, member_id).await?;
        tx.commit().await?;
        Ok(member)
    }

    // =========================================================================
    //  SEMÁFOROS
    // =========================================================================

    /// Recalcula sob demanda (POST /api/members/{id}/indicators).
    pub async fn refresh(&self, member_id: Uuid) -> Result<Member, AppError> {
        self.indicators
            .refresh_member(member_id)
            .await?
            .map(|r| r.into_member())
            .ok_or(AppError::MemberNotFound)
    }

    async fn reclassify_in(&self, conn: &mut PgConnection, member_id: Uuid) -> Result<Member, AppError> {
        self.indicators
            .refresh_in(conn, member_id)
            .await?
            .map(|r| r.into_member())
            .ok_or(AppError::MemberNotFound)
    }
}
