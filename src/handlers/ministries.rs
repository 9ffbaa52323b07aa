// src/handlers/ministries.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermMembersRead, PermMinistriesWrite, RequirePermission},
    },
    models::{
        member::Member,
        ministry::{CreateMinistryPayload, Ministry},
    },
};

// POST /api/ministries
#[utoipa::path(
    post,
    path = "/api/ministries",
    tag = "Ministries",
    request_body = CreateMinistryPayload,
    responses(
        (status = 201, description = "Ministério criado", body = Ministry),
        (status = 409, description = "Nome já usado"),
        (status = 422, description = "Anexo ou líder inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_ministry(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMinistriesWrite>,
    Json(payload): Json<CreateMinistryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let ministry = app_state.ministry_repo
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(ministry)))
}

// GET /api/ministries
#[utoipa::path(
    get,
    path = "/api/ministries",
    tag = "Ministries",
    responses((status = 200, description = "Lista de ministérios", body = Vec<Ministry>)),
    security(("api_jwt" = []))
)]
pub async fn list_ministries(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let ministries = app_state.ministry_repo
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ministries))
}

// GET /api/ministries/{id}/members
#[utoipa::path(
    get,
    path = "/api/ministries/{id}/members",
    tag = "Ministries",
    params(("id" = Uuid, Path, description = "ID do ministério")),
    responses(
        (status = 200, description = "Membros do ministério", body = Vec<Member>),
        (status = 404, description = "Ministério não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_ministry_members(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMembersRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let members = app_state.member_service
        .list_ministry_members(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(members))
}
