// src/handlers/members.rs

use axum::{
    extract::{Path, Query, State},
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
        i18n::Locale,
        rbac::{PermIndicatorsManage, PermMembersRead, PermMembersWrite, RequirePermission},
    },
    models::member::{CreateMemberPayload, Member, MemberFilter, UpdateMemberPayload},
};

// =============================================================================
//  CADASTRO
// =============================================================================

// POST /api/members
#[utoipa::path(
    post,
    path = "/api/members",
    tag = "Members",
    request_body = CreateMemberPayload,
    responses(
        (status = 201, description = "Membro criado (já classificado)", body = Member),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Anexo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_member(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMembersWrite>,
    Json(payload): Json<CreateMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let member = app_state.member_service
        .create_member(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(member)))
}

// GET /api/members?anexoId=...
#[utoipa::path(
    get,
    path = "/api/members",
    tag = "Members",
    params(("anexoId" = Option<Uuid>, Query, description = "Filtra por anexo")),
    responses((status = 200, description = "Lista de membros", body = Vec<Member>)),
    security(("api_jwt" = []))
)]
pub async fn list_members(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMembersRead>,
    Query(filter): Query<MemberFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let members = app_state.member_service
        .list_members(filter.anexo_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(members))
}

// GET /api/members/{id}
#[utoipa::path(
    get,
    path = "/api/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "ID do membro")),
    responses(
        (status = 200, description = "Membro", body = Member),
        (status = 404, description = "Membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_member(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMembersRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member = app_state.member_service
        .get_member(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(member))
}

// PUT /api/members/{id}
#[utoipa::path(
    put,
    path = "/api/members/{id}",
    tag = "Members",
    request_body = UpdateMemberPayload,
    params(("id" = Uuid, Path, description = "ID do membro")),
    responses(
        (status = 200, description = "Membro atualizado", body = Member),
        (status = 404, description = "Membro ou anexo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_member(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMembersWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let member = app_state.member_service
        .update_member(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(member))
}

// DELETE /api/members/{id}
#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "ID do membro")),
    responses(
        (status = 204, description = "Membro removido"),
        (status = 404, description = "Membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_member(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMembersWrite>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.member_service
        .delete_member(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  SEMÁFOROS E MINISTÉRIOS
// =============================================================================

// POST /api/members/{id}/indicators
#[utoipa::path(
    post,
    path = "/api/members/{id}/indicators",
    tag = "Members",
    params(("id" = Uuid, Path, description = "ID do membro")),
    responses(
        (status = 200, description = "Semáforos recalculados", body = Member),
        (status = 404, description = "Membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn refresh_member_indicators(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermIndicatorsManage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member = app_state.member_service
        .refresh(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(member))
}

// PUT /api/members/{id}/ministries/{ministry_id}
#[utoipa::path(
    put,
    path = "/api/members/{id}/ministries/{ministry_id}",
    tag = "Members",
    params(
        ("id" = Uuid, Path, description = "ID do membro"),
        ("ministry_id" = Uuid, Path, description = "ID do ministério")
    ),
    responses(
        (status = 200, description = "Membro vinculado ao ministério", body = Member),
        (status = 404, description = "Membro ou ministério não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn join_ministry(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMembersWrite>,
    Path((id, ministry_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let member = app_state.member_service
        .join_ministry(id, ministry_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(member))
}

// DELETE /api/members/{id}/ministries/{ministry_id}
#[utoipa::path(
    delete,
    path = "/api/members/{id}/ministries/{ministry_id}",
    tag = "Members",
    params(
        ("id" = Uuid, Path, description = "ID do membro"),
        ("ministry_id" = Uuid, Path, description = "ID do ministério")
    ),
    responses(
        (status = 200, description = "Vínculo removido", body = Member),
        (status = 404, description = "Membro ou vínculo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn leave_ministry(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMembersWrite>,
    Path((id, ministry_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let member = app_state.member_service
        .leave_ministry(id, ministry_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(member))
}
