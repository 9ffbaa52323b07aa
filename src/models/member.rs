// src/models/member.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::indicator::{IndicatorLevel, MemberIndicators};

// --- MEMBRO ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Uuid,

    #[schema(example = "Maria Fernanda Souza")]
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,

    // None = membro de todos os anexos
    pub anexo_id: Option<Uuid>,

    // Vem de um ARRAY(...) sobre member_ministries
    pub ministry_ids: Vec<Uuid>,

    // Semáforos derivados (recalculados pelo classificador)
    pub attendance_level: IndicatorLevel,
    pub fidelity_level: IndicatorLevel,
    pub service_level: IndicatorLevel,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn indicators(&self) -> MemberIndicators {
        MemberIndicators {
            attendance_level: self.attendance_level,
            fidelity_level: self.fidelity_level,
            service_level: self.service_level,
        }
    }

    pub fn set_indicators(&mut self, indicators: MemberIndicators) {
        self.attendance_level = indicators.attendance_level;
        self.fidelity_level = indicators.fidelity_level;
        self.service_level = indicators.service_level;
    }
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberPayload {
    #[validate(length(min = 2, message = "name_too_short"))]
    #[schema(example = "Maria Fernanda Souza")]
    pub full_name: String,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub anexo_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberPayload {
    #[validate(length(min = 2, message = "name_too_short"))]
    pub full_name: String,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub anexo_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberFilter {
    pub anexo_id: Option<Uuid>,
}
