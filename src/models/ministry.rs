// src/models/ministry.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ministry {
    pub id: Uuid,

    #[schema(example = "Louvor")]
    pub name: String,
    pub description: Option<String>,

    // None = ministério de todos os anexos
    pub anexo_id: Option<Uuid>,
    pub leader_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMinistryPayload {
    #[validate(length(min = 2, message = "name_too_short"))]
    pub name: String,
    pub description: Option<String>,
    pub anexo_id: Option<Uuid>,
    pub leader_id: Option<Uuid>,
}
