// src/services/mission_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::MissionRepository,
    models::mission::{
        CreateTripPayload, MissionTrip, ParticipantStatus, TripParticipant, UpdateParticipantPayload,
    },
    services::indicator_service::IndicatorService,
};

#[derive(Clone)]
pub struct MissionService {
    repo: MissionRepository,
    indicators: IndicatorService,
    pool: PgPool,
}

/// Aplica a alteração pedida sobre o estado atual do participante.
///
/// Só quem está APPROVED pode ter `attended = true`; sair de APPROVED zera a presença.
pub fn apply_participant_update(
    current: &TripParticipant,
    input: &UpdateParticipantPayload,
) -> Result<(ParticipantStatus, bool), AppError> {
    let status = input.status.unwrap_or(current.status);

    let attended = match (status, input.attended) {
        (ParticipantStatus::Approved, Some(flag)) => flag,
        (ParticipantStatus::Approved, None) => current.attended,
        (_, Some(true)) => return Err(AppError::ParticipantNotApproved),
        (_, _) => false,
    };

    Ok((status, attended))
}

impl MissionService {
    pub fn new(repo: MissionRepository, indicators: IndicatorService, pool: PgPool) -> Self {
        Self { repo, indicators, pool }
    }

    pub async fn create_trip(&self, input: &CreateTripPayload) -> Result<MissionTrip, AppError> {
        let trip = self.repo.create_trip(input).await?;
        tracing::info!(trip_id = %trip.id, "viagem missionária criada");
        Ok(trip)
    }

    pub async fn list_trips(&self) -> Result<Vec<MissionTrip>, AppError> {
        self.repo.list_trips().await
    }

    /// Propor um membro não muda o semáforo: PROPOSED não conta como serviço.
    pub async fn propose_participant(&self, trip_id: Uuid, member_id: Uuid) -> Result<TripParticipant, AppError> {
        if !self.repo.trip_exists(trip_id).await? {
            return Err(AppError::TripNotFound);
        }

        self.repo
            .add_participant(trip_id, member_id)
            .await
            .map_err(|e| match e {
                AppError::ForeignKeyViolation(_) => AppError::MemberNotFound,
                other => other,
            })
    }

    pub async fn update_participant(
        &self,
        trip_id: Uuid,
        member_id: Uuid,
        input: &UpdateParticipantPayload,
    ) -> Result<TripParticipant, AppError> {
        let mut tx = self.pool.begin().await?;

        // Mesma ordem de locks dos demais caminhos: membro antes das linhas filhas
        self.indicators
            .lock_member(&mut tx, member_id)
            .await?
            .ok_or(AppError::ParticipantNotFound)?;

        let current = self.repo
            .lock_participant(&mut *tx, trip_id, member_id)
            .await?
            .ok_or(AppError::ParticipantNotFound)?;

        let (status, attended) = apply_participant_update(&current, input)?;
        let updated = self.repo
            .update_participant(&mut *tx, trip_id, member_id, status, attended)
            .await?;
        self.indicators.refresh_in(&mut tx, member_id).await?;

        tx.commit().await?;

        tracing::info!(%trip_id, %member_id, status = ?updated.status, attended = updated.attended, "participante atualizado");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(status: ParticipantStatus, attended: bool) -> TripParticipant {
        TripParticipant {
            trip_id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            status,
            attended,
        }
    }

    fn update(status: Option<ParticipantStatus>, attended: Option<bool>) -> UpdateParticipantPayload {
        UpdateParticipantPayload { status, attended }
    }

    #[test]
    fn approving_and_attending_in_one_step() {
        let current = participant(ParticipantStatus::Proposed, false);
        let result = apply_participant_update(&current, &update(Some(ParticipantStatus::Approved), Some(true)));

        assert_eq!(result.unwrap(), (ParticipantStatus::Approved, true));
    }

    #[test]
    fn attending_without_approval_is_rejected() {
        let current = participant(ParticipantStatus::Proposed, false);
        let result = apply_participant_update(&current, &update(None, Some(true)));

        assert!(matches!(result, Err(AppError::ParticipantNotApproved)));
    }

    #[test]
    fn leaving_approved_clears_attendance() {
        let current = participant(ParticipantStatus::Approved, true);
        let result = apply_participant_update(&current, &update(Some(ParticipantStatus::Rejected), None));

        assert_eq!(result.unwrap(), (ParticipantStatus::Rejected, false));
    }

    #[test]
    fn missing_fields_keep_current_values() {
        let current = participant(ParticipantStatus::Approved, true);
        let result = apply_participant_update(&current, &update(None, None));

        assert_eq!(result.unwrap(), (ParticipantStatus::Approved, true));
    }

    #[test]
    fn approved_member_can_be_unmarked() {
        let current = participant(ParticipantStatus::Approved, true);
        let result = apply_participant_update(&current, &update(None, Some(false)));

        assert_eq!(result.unwrap(), (ParticipantStatus::Approved, false));
    }
}
