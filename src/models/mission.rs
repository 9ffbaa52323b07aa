// src/models/mission.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "participant_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantStatus {
    Proposed,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripParticipant {
    pub trip_id: Uuid,
    pub member_id: Uuid,
    pub status: ParticipantStatus,

    // Só tem significado quando status = APPROVED
    pub attended: bool,
}

impl TripParticipant {
    /// Conta como serviço: aprovado e efetivamente foi na viagem.
    pub fn served(&self) -> bool {
        self.status == ParticipantStatus::Approved && self.attended
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MissionTrip {
    pub id: Uuid,

    #[schema(example = "Missão Sertão 2025")]
    pub name: String,
    pub destination: Option<String>,

    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,

    // Preenchido pelo repositório a partir de trip_participants
    #[sqlx(skip)]
    pub participants: Vec<TripParticipant>,

    pub created_at: DateTime<Utc>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripPayload {
    #[validate(length(min = 2, message = "name_too_short"))]
    pub name: String,
    pub destination: Option<String>,

    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposeParticipantPayload {
    pub member_id: Uuid,
}

// Campos ausentes mantêm o valor atual
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParticipantPayload {
    pub status: Option<ParticipantStatus>,
    pub attended: Option<bool>,
}
