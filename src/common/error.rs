// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Erros de domínio. Cada variante tem um código estável (ver `code`),
// que o I18nStore traduz para o idioma do cliente.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Valor inválido")]
    InvalidAmount,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permissão ausente: {0}")]
    Forbidden(&'static str),

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Membro não encontrado")]
    MemberNotFound,

    #[error("Anexo não encontrado")]
    AnexoNotFound,

    #[error("Ministério não encontrado")]
    MinistryNotFound,

    #[error("Evento não encontrado")]
    EventNotFound,

    #[error("Lançamento não encontrado")]
    TransactionNotFound,

    #[error("Registro de intercessão não encontrado")]
    IntercessionLogNotFound,

    #[error("Viagem não encontrada")]
    TripNotFound,

    #[error("Participante não encontrado")]
    ParticipantNotFound,

    #[error("Matrícula não encontrada")]
    EnrollmentNotFound,

    #[error("Participante não aprovado")]
    ParticipantNotApproved,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Referência inválida: {0}")]
    ForeignKeyViolation(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// O erro que efetivamente vai para o cliente (já traduzido).
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    /// Converte erros do Postgres de unicidade/chave estrangeira nas variantes próprias.
    pub fn from_db(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return match constraint.as_str() {
                    "users_email_key" => AppError::EmailAlreadyExists,
                    _ => AppError::UniqueConstraintViolation(constraint),
                };
            }
            if db_err.is_foreign_key_violation() {
                return AppError::ForeignKeyViolation(constraint);
            }
        }
        AppError::DatabaseError(e)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidAmount => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::MemberNotFound
            | AppError::AnexoNotFound
            | AppError::MinistryNotFound
            | AppError::EventNotFound
            | AppError::TransactionNotFound
            | AppError::IntercessionLogNotFound
            | AppError::TripNotFound
            | AppError::ParticipantNotFound
            | AppError::EnrollmentNotFound => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists
            | AppError::UniqueConstraintViolation(_)
            | AppError::ParticipantNotApproved => StatusCode::CONFLICT,
            AppError::ForeignKeyViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Chave da mensagem no I18nStore
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_failed",
            AppError::InvalidAmount => "invalid_amount",
            AppError::EmailAlreadyExists => "email_already_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::Forbidden(_) => "forbidden",
            AppError::UserNotFound => "user_not_found",
            AppError::MemberNotFound => "member_not_found",
            AppError::AnexoNotFound => "anexo_not_found",
            AppError::MinistryNotFound => "ministry_not_found",
            AppError::EventNotFound => "event_not_found",
            AppError::TransactionNotFound => "transaction_not_found",
            AppError::IntercessionLogNotFound => "intercession_log_not_found",
            AppError::TripNotFound => "trip_not_found",
            AppError::ParticipantNotFound => "participant_not_found",
            AppError::EnrollmentNotFound => "enrollment_not_found",
            AppError::ParticipantNotApproved => "participant_not_approved",
            AppError::UniqueConstraintViolation(_) => "duplicate_record",
            AppError::ForeignKeyViolation(_) => "invalid_reference",
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => "internal_error",
        }
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();

        // O `tracing` registra a mensagem detalhada; o cliente só vê a genérica.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut fields = Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            let key = e.message.as_deref().unwrap_or(e.code.as_ref());
                            Value::String(store.translate(&locale.0, key))
                        })
                        .collect();
                    fields.insert(field.to_string(), Value::Array(messages));
                }
                Some(Value::Object(fields))
            }
            AppError::Forbidden(permission) => Some(json!({ "permission": permission })),
            AppError::UniqueConstraintViolation(c) | AppError::ForeignKeyViolation(c)
                if !c.is_empty() =>
            {
                Some(json!({ "constraint": c }))
            }
            _ => None,
        };

        ApiError {
            status,
            error: store.translate(&locale.0, self.code()),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 2, message = "name_too_short"))]
        name: String,
    }

    fn pt() -> Locale {
        Locale("pt".to_string())
    }

    #[test]
    fn not_found_maps_to_404_in_requested_language() {
        let store = I18nStore::new();
        let api = AppError::MemberNotFound.to_api_error(&pt(), &store);

        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Membro não encontrado.");
        assert!(api.details.is_none());
    }

    #[test]
    fn validation_errors_carry_translated_field_details() {
        let store = I18nStore::new();
        let errors = Probe { name: "x".into() }.validate().unwrap_err();
        let api = AppError::from(errors).to_api_error(&pt(), &store);

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("detalhes da validação");
        assert_eq!(
            details["name"][0],
            Value::String("O nome deve ter no mínimo 2 caracteres.".into())
        );
    }

    #[test]
    fn forbidden_reports_missing_permission() {
        let store = I18nStore::new();
        let api = AppError::Forbidden("finance:write").to_api_error(&Locale("en".into()), &store);

        assert_eq!(api.status, StatusCode::FORBIDDEN);
        assert_eq!(api.details, Some(json!({ "permission": "finance:write" })));
    }

    #[test]
    fn internal_errors_are_generic() {
        let store = I18nStore::new();
        let api = AppError::from(anyhow::anyhow!("conexão caiu")).to_api_error(&pt(), &store);

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error, "Ocorreu um erro inesperado.");
    }
}
