// src/models/epmi.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "epmi_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EpmiStatus {
    Active,
    Withdrawn,
}

// Matrícula no programa de formação ministerial (EPMI)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EpmiEnrollment {
    pub id: Uuid,
    pub member_id: Uuid,
    pub status: EpmiStatus,

    #[schema(example = "2025-1")]
    pub cycle: String,

    #[schema(value_type = String, format = Date)]
    pub enrolled_at: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollPayload {
    pub member_id: Uuid,

    #[validate(length(min = 1, max = 20, message = "invalid_cycle"))]
    #[schema(example = "2025-1")]
    pub cycle: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnrollmentStatusPayload {
    pub status: EpmiStatus,
}
