// src/models/intercession.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Mapeia o CREATE TYPE intercession_log_type do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "intercession_log_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntercessionLogType {
    WeeklyMeeting, // Reunião semanal de oração
    FirstFast,     // Jejum mensal (1º dia)
    SecondFast,    // Jejum mensal (2º dia)
    ThirdFast,     // Jejum mensal (3º dia)
}

/// A existência da linha significa "participou". Desmarcar apaga a linha.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntercessionLog {
    pub id: Uuid,
    pub member_id: Uuid,
    pub log_type: IntercessionLogType,

    #[schema(value_type = String, format = Date, example = "2025-03-05")]
    pub log_date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntercessionLogPayload {
    pub member_id: Uuid,
    pub log_type: IntercessionLogType,

    #[schema(value_type = String, format = Date, example = "2025-03-05")]
    pub log_date: NaiveDate,
}
