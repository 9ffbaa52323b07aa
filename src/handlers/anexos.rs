// src/handlers/anexos.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermAnexosWrite, RequirePermission},
    },
    models::anexo::{Anexo, CreateAnexoPayload},
};

// POST /api/anexos
#[utoipa::path(
    post,
    path = "/api/anexos",
    tag = "Anexos",
    request_body = CreateAnexoPayload,
    responses(
        (status = 201, description = "Anexo criado", body = Anexo),
        (status = 409, description = "Nome já usado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_anexo(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermAnexosWrite>,
    Json(payload): Json<CreateAnexoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let anexo = app_state.anexo_repo
        .create(payload.name.trim(), payload.address.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(anexo)))
}

// GET /api/anexos
#[utoipa::path(
    get,
    path = "/api/anexos",
    tag = "Anexos",
    responses((status = 200, description = "Lista de anexos", body = Vec<Anexo>)),
    security(("api_jwt" = []))
)]
pub async fn list_anexos(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let anexos = app_state.anexo_repo
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(anexos))
}
