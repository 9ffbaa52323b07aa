// src/models/anexo.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// O local físico da igreja (sede, anexo do bairro, etc.)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Anexo {
    pub id: Uuid,

    #[schema(example = "Anexo Vila Nova")]
    pub name: String,

    #[schema(example = "Rua das Flores, 123")]
    pub address: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnexoPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub address: Option<String>,
}
