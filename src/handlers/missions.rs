// src/handlers/missions.rs

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
        rbac::{PermMembersRead, PermMissionsWrite, RequirePermission},
    },
    models::mission::{
        CreateTripPayload, MissionTrip, ProposeParticipantPayload, TripParticipant,
        UpdateParticipantPayload,
    },
};

// POST /api/missions
#[utoipa::path(
    post,
    path = "/api/missions",
    tag = "Missions",
    request_body = CreateTripPayload,
    responses((status = 201, description = "Viagem criada", body = MissionTrip)),
    security(("api_jwt" = []))
)]
pub async fn create_trip(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMissionsWrite>,
    Json(payload): Json<CreateTripPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let trip = app_state.mission_service
        .create_trip(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(trip)))
}

// GET /api/missions
#[utoipa::path(
    get,
    path = "/api/missions",
    tag = "Missions",
    responses((status = 200, description = "Viagens com participantes", body = Vec<MissionTrip>)),
    security(("api_jwt" = []))
)]
pub async fn list_trips(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMembersRead>,
) -> Result<impl IntoResponse, ApiError> {
    let trips = app_state.mission_service
        .list_trips()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(trips))
}

// POST /api/missions/{id}/participants
#[utoipa::path(
    post,
    path = "/api/missions/{id}/participants",
    tag = "Missions",
    request_body = ProposeParticipantPayload,
    params(("id" = Uuid, Path, description = "ID da viagem")),
    responses(
        (status = 201, description = "Membro proposto", body = TripParticipant),
        (status = 404, description = "Viagem ou membro não encontrado"),
        (status = 409, description = "Membro já está na viagem")
    ),
    security(("api_jwt" = []))
)]
pub async fn propose_participant(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMissionsWrite>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<ProposeParticipantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let participant = app_state.mission_service
        .propose_participant(trip_id, payload.member_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(participant)))
}

// PUT /api/missions/{id}/participants/{member_id}
#[utoipa::path(
    put,
    path = "/api/missions/{id}/participants/{member_id}",
    tag = "Missions",
    request_body = UpdateParticipantPayload,
    params(
        ("id" = Uuid, Path, description = "ID da viagem"),
        ("member_id" = Uuid, Path, description = "ID do membro")
    ),
    responses(
        (status = 200, description = "Participante atualizado", body = TripParticipant),
        (status = 404, description = "Participante não encontrado"),
        (status = 409, description = "Presença exige aprovação")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_participant(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMissionsWrite>,
    Path((trip_id, member_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateParticipantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let participant = app_state.mission_service
        .update_participant(trip_id, member_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(participant))
}
