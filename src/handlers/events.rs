// src/handlers/events.rs

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
        rbac::{PermAttendanceWrite, PermMembersRead, RequirePermission},
    },
    models::event::{AttendanceMark, CreateEventPayload, DateRangeFilter, Event, SetAttendancePayload},
};

// POST /api/events
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    request_body = CreateEventPayload,
    responses(
        (status = 201, description = "Evento criado", body = Event),
        (status = 404, description = "Anexo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_event(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermAttendanceWrite>,
    Json(payload): Json<CreateEventPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let event = app_state.attendance_service
        .create_event(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(event)))
}

// GET /api/events?from=...&to=...
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    params(
        ("from" = Option<String>, Query, description = "Data inicial (AAAA-MM-DD)"),
        ("to" = Option<String>, Query, description = "Data final (AAAA-MM-DD)")
    ),
    responses((status = 200, description = "Eventos, mais recentes primeiro", body = Vec<Event>)),
    security(("api_jwt" = []))
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMembersRead>,
    Query(range): Query<DateRangeFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let events = app_state.attendance_service
        .list_events(range.from, range.to)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(events))
}

// GET /api/events/{id}/attendance
#[utoipa::path(
    get,
    path = "/api/events/{id}/attendance",
    tag = "Events",
    params(("id" = Uuid, Path, description = "ID do evento")),
    responses(
        (status = 200, description = "Presenças registradas", body = Vec<AttendanceMark>),
        (status = 404, description = "Evento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_attendance(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMembersRead>,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let marks = app_state.attendance_service
        .list_attendance(event_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(marks))
}

// PUT /api/events/{id}/attendance
#[utoipa::path(
    put,
    path = "/api/events/{id}/attendance",
    tag = "Events",
    request_body = SetAttendancePayload,
    params(("id" = Uuid, Path, description = "ID do evento")),
    responses(
        (status = 200, description = "Presença gravada", body = AttendanceMark),
        (status = 404, description = "Evento ou membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_attendance(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermAttendanceWrite>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<SetAttendancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mark = app_state.attendance_service
        .set_attendance(event_id, payload.member_id, payload.present)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(mark))
}

// DELETE /api/events/{id}/attendance/{member_id}
#[utoipa::path(
    delete,
    path = "/api/events/{id}/attendance/{member_id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "ID do evento"),
        ("member_id" = Uuid, Path, description = "ID do membro")
    ),
    responses((status = 204, description = "Marcação removida")),
    security(("api_jwt" = []))
)]
pub async fn clear_attendance(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermAttendanceWrite>,
    Path((event_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.attendance_service
        .clear_attendance(event_id, member_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
