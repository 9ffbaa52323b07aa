// src/models/finance.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use sqlx::FromRow;
use chrono::{DateTime, Utc, NaiveDate};
use rust_decimal::Decimal;
use utoipa::ToSchema;
use validator::Validate;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Tithe,    // Dízimo
    Offering, // Oferta
    Donation, // Doação
    Expense,  // Despesa
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceTransaction {
    pub id: Uuid,

    // None = doação anônima
    pub member_id: Option<Uuid>,

    #[schema(value_type = f64, example = "150.00")]
    pub amount: Decimal,
    pub transaction_type: TransactionType,

    #[schema(value_type = String, format = Date, example = "2025-03-02")]
    pub transaction_date: NaiveDate,

    #[schema(example = "Dízimo de março")]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionPayload {
    pub member_id: Option<Uuid>,

    #[schema(value_type = f64, example = "150.00")]
    pub amount: Decimal,
    pub transaction_type: TransactionType,

    #[schema(value_type = String, format = Date, example = "2025-03-02")]
    pub transaction_date: NaiveDate,

    #[validate(length(max = 500, message = "too_long"))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub member_id: Option<Uuid>,
}
