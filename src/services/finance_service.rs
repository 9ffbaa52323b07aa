// src/services/finance_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FinanceRepository,
    models::finance::{CreateTransactionPayload, FinanceTransaction},
    services::indicator_service::IndicatorService,
};

#[derive(Clone)]
pub struct FinanceService {
    repo: FinanceRepository,
    indicators: IndicatorService,
}

impl FinanceService {
    pub fn new(repo: FinanceRepository, indicators: IndicatorService) -> Self {
        Self { repo, indicators }
    }

    /// Registra o lançamento; se tiver membro, a fidelidade dele é recalculada.
    pub async fn record_transaction(&self, input: &CreateTransactionPayload) -> Result<FinanceTransaction, AppError> {
        if input.amount <= Decimal::ZERO {
            return Err(AppError::InvalidAmount);
        }

        let mut tx = self.indicators.begin().await?;

        // O membro é travado antes do INSERT que o referencia
        if let Some(member_id) = input.member_id {
            self.indicators
                .lock_member(&mut tx, member_id)
                .await?
                .ok_or(AppError::MemberNotFound)?;
        }

        let transaction = self.repo.create(&mut *tx, input).await?;

        tracing::info!(
            transaction_id = %transaction.id,
            kind = ?transaction.transaction_type,
            anonymous = transaction.member_id.is_none(),
            "lançamento registrado"
        );

        if let Some(member_id) = transaction.member_id {
            self.indicators.refresh_in(&mut tx, member_id).await?;
        }

        tx.commit().await?;
        Ok(transaction)
    }

    pub async fn list_transactions(&self, member_id: Option<Uuid>) -> Result<Vec<FinanceTransaction>, AppError> {
        self.repo.list(member_id).await
    }

    pub async fn delete_transaction(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.indicators.begin().await?;

        let deleted = self.repo
            .delete(&mut *tx, id)
            .await?
            .ok_or(AppError::TransactionNotFound)?;

        if let Some(member_id) = deleted.member_id {
            self.indicators.refresh_in(&mut tx, member_id).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

// Precisam de um Postgres (DATABASE_URL); cada teste recebe um banco migrado e descartável.
// cargo test -- --ignored
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{EpmiRepository, EventRepository, IntercessionRepository, MemberRepository, MissionRepository},
        models::{finance::TransactionType, indicator::IndicatorLevel, member::CreateMemberPayload},
    };
    use chrono::Utc;
    use sqlx::PgPool;

    fn finance_service(pool: &PgPool) -> FinanceService {
        let finance_repo = FinanceRepository::new(pool.clone());
        let indicators = IndicatorService::new(
            MemberRepository::new(),
            EventRepository::new(pool.clone()),
            finance_repo.clone(),
            IntercessionRepository::new(pool.clone()),
            MissionRepository::new(pool.clone()),
            EpmiRepository::new(pool.clone()),
            pool.clone(),
        );
        FinanceService::new(finance_repo, indicators)
    }

    async fn new_member(pool: &PgPool) -> Uuid {
        let payload = CreateMemberPayload {
            full_name: "Ester Nogueira".into(),
            email: None,
            phone: None,
            birth_date: None,
            anexo_id: None,
        };
        MemberRepository::new().create(pool, &payload).await.unwrap().id
    }

    fn tithe(member_id: Option<Uuid>) -> CreateTransactionPayload {
        CreateTransactionPayload {
            member_id,
            amount: Decimal::new(10000, 2),
            transaction_type: TransactionType::Tithe,
            transaction_date: Utc::now().date_naive(),
            description: None,
        }
    }

    async fn stored_transactions(pool: &PgPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM finance_transactions")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test]
    #[ignore = "requer Postgres"]
    async fn tithe_and_fidelity_are_committed_together(pool: PgPool) {
        let member_id = new_member(&pool).await;

        finance_service(&pool).record_transaction(&tithe(Some(member_id))).await.unwrap();

        let member = MemberRepository::new().find_by_id(&pool, member_id).await.unwrap().unwrap();
        assert_eq!(member.fidelity_level, IndicatorLevel::Yellow);
        assert_eq!(stored_transactions(&pool).await, 1);
    }

    #[sqlx::test]
    #[ignore = "requer Postgres"]
    async fn failed_reclassification_rolls_back_the_tithe(pool: PgPool) {
        let member_id = new_member(&pool).await;
        // A reclassificação lê esta tabela depois do INSERT do lançamento
        sqlx::query("DROP TABLE epmi_enrollments").execute(&pool).await.unwrap();

        let result = finance_service(&pool).record_transaction(&tithe(Some(member_id))).await;

        assert!(result.is_err());
        assert_eq!(stored_transactions(&pool).await, 0);
        let member = MemberRepository::new().find_by_id(&pool, member_id).await.unwrap().unwrap();
        assert_eq!(member.fidelity_level, IndicatorLevel::Red);
    }

    #[sqlx::test]
    #[ignore = "requer Postgres"]
    async fn tithe_for_unknown_member_writes_nothing(pool: PgPool) {
        let result = finance_service(&pool).record_transaction(&tithe(Some(Uuid::new_v4()))).await;

        assert!(matches!(result, Err(AppError::MemberNotFound)));
        assert_eq!(stored_transactions(&pool).await, 0);
    }
}
