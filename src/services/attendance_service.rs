// src/services/attendance_service.rs

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::EventRepository,
    models::event::{AttendanceMark, CreateEventPayload, Event},
    services::indicator_service::IndicatorService,
};

#[derive(Clone)]
pub struct AttendanceService {
    repo: EventRepository,
    indicators: IndicatorService,
}

impl AttendanceService {
    pub fn new(repo: EventRepository, indicators: IndicatorService) -> Self {
        Self { repo, indicators }
    }

    pub async fn create_event(&self, input: &CreateEventPayload) -> Result<Event, AppError> {
        let event = self.repo
            .create(input)
            .await
            .map_err(|e| match e {
                AppError::ForeignKeyViolation(_) => AppError::AnexoNotFound,
                other => other,
            })?;
        tracing::info!(event_id = %event.id, event_type = ?event.event_type, "evento criado");
        Ok(event)
    }

    pub async fn list_events(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Vec<Event>, AppError> {
        self.repo.list(from, to).await
    }

    pub async fn list_attendance(&self, event_id: Uuid) -> Result<Vec<AttendanceMark>, AppError> {
        if !self.repo.exists(event_id).await? {
            return Err(AppError::EventNotFound);
        }
        self.repo.list_attendance(event_id).await
    }

    /// Marca presença/ausência e reclassifica o membro na mesma transação.
    pub async fn set_attendance(
        &self,
        event_id: Uuid,
        member_id: Uuid,
        present: bool,
    ) -> Result<AttendanceMark, AppError> {
        if !self.repo.exists(event_id).await? {
            return Err(AppError::EventNotFound);
        }

        let mut tx = self.indicators.begin().await?;
        self.indicators
            .lock_member(&mut tx, member_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;

        let mark = self.repo.set_attendance(&mut *tx, event_id, member_id, present).await?;
        self.indicators.refresh_in(&mut tx, member_id).await?;

        tx.commit().await?;
        Ok(mark)
    }

    /// Volta ao estado "não registrado".
    pub async fn clear_attendance(&self, event_id: Uuid, member_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.indicators.begin().await?;
        if self.repo.clear_attendance(&mut *tx, event_id, member_id).await? {
            self.indicators.refresh_in(&mut tx, member_id).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
