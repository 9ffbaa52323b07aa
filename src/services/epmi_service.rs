// src/services/epmi_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::EpmiRepository,
    models::epmi::{EpmiEnrollment, EpmiStatus},
    services::indicator_service::IndicatorService,
};

#[derive(Clone)]
pub struct EpmiService {
    repo: EpmiRepository,
    indicators: IndicatorService,
}

impl EpmiService {
    pub fn new(repo: EpmiRepository, indicators: IndicatorService) -> Self {
        Self { repo, indicators }
    }

    pub async fn enroll(&self, member_id: Uuid, cycle: &str) -> Result<EpmiEnrollment, AppError> {
        let mut tx = self.indicators.begin().await?;
        self.indicators
            .lock_member(&mut tx, member_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;

        let enrollment = self.repo.enroll(&mut *tx, member_id, cycle.trim()).await?;
        self.indicators.refresh_in(&mut tx, member_id).await?;
        tx.commit().await?;

        tracing::info!(member_id = %member_id, cycle = %enrollment.cycle, "matrícula EPMI criada");
        Ok(enrollment)
    }

    pub async fn change_status(&self, id: Uuid, status: EpmiStatus) -> Result<EpmiEnrollment, AppError> {
        let mut tx = self.indicators.begin().await?;
        let enrollment = self.repo
            .update_status(&mut *tx, id, status)
            .await?
            .ok_or(AppError::EnrollmentNotFound)?;

        self.indicators.refresh_in(&mut tx, enrollment.member_id).await?;
        tx.commit().await?;
        Ok(enrollment)
    }

    pub async fn list(&self) -> Result<Vec<EpmiEnrollment>, AppError> {
        self.repo.list().await
    }
}
