// src/handlers/epmi.rs

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
        i18n::Locale,
        rbac::{PermEpmiWrite, PermMembersRead, RequirePermission},
    },
    models::epmi::{EnrollPayload, EpmiEnrollment, UpdateEnrollmentStatusPayload},
};

// POST /api/epmi/enrollments
#[utoipa::path(
    post,
    path = "/api/epmi/enrollments",
    tag = "EPMI",
    request_body = EnrollPayload,
    responses(
        (status = 201, description = "Matrícula criada", body = EpmiEnrollment),
        (status = 404, description = "Membro não encontrado"),
        (status = 409, description = "Membro já matriculado no ciclo")
    ),
    security(("api_jwt" = []))
)]
pub async fn enroll(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermEpmiWrite>,
    Json(payload): Json<EnrollPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let enrollment = app_state.epmi_service
        .enroll(payload.member_id, &payload.cycle)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(enrollment)))
}

// GET /api/epmi/enrollments
#[utoipa::path(
    get,
    path = "/api/epmi/enrollments",
    tag = "EPMI",
    responses((status = 200, description = "Matrículas", body = Vec<EpmiEnrollment>)),
    security(("api_jwt" = []))
)]
pub async fn list_enrollments(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMembersRead>,
) -> Result<impl IntoResponse, ApiError> {
    let enrollments = app_state.epmi_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(enrollments))
}

// PUT /api/epmi/enrollments/{id}/status
#[utoipa::path(
    put,
    path = "/api/epmi/enrollments/{id}/status",
    tag = "EPMI",
    request_body = UpdateEnrollmentStatusPayload,
    params(("id" = Uuid, Path, description = "ID da matrícula")),
    responses(
        (status = 200, description = "Status alterado", body = EpmiEnrollment),
        (status = 404, description = "Matrícula não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_enrollment_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermEpmiWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEnrollmentStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let enrollment = app_state.epmi_service
        .change_status(id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(enrollment))
}
