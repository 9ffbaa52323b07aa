// src/services/intercession_service.rs

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::IntercessionRepository,
    models::intercession::{CreateIntercessionLogPayload, IntercessionLog},
    services::indicator_service::IndicatorService,
};

#[derive(Clone)]
pub struct IntercessionService {
    repo: IntercessionRepository,
    indicators: IndicatorService,
}

impl IntercessionService {
    pub fn new(repo: IntercessionRepository, indicators: IndicatorService) -> Self {
        Self { repo, indicators }
    }

    /// Marcar participação = criar o registro.
    pub async fn mark(&self, input: &CreateIntercessionLogPayload) -> Result<IntercessionLog, AppError> {
        let mut tx = self.indicators.begin().await?;
        self.indicators
            .lock_member(&mut tx, input.member_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;

        let log = self.repo.create(&mut *tx, input).await?;
        self.indicators.refresh_in(&mut tx, log.member_id).await?;

        tx.commit().await?;
        Ok(log)
    }

    /// Desmarcar = apagar o registro (não existe flag "false").
    pub async fn unmark(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.indicators.begin().await?;
        let deleted = self.repo
            .delete(&mut *tx, id)
            .await?
            .ok_or(AppError::IntercessionLogNotFound)?;

        self.indicators.refresh_in(&mut tx, deleted.member_id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn list(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Vec<IntercessionLog>, AppError> {
        self.repo.list(from, to).await
    }
}
