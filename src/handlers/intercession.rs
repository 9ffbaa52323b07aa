// src/handlers/intercession.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermIntercessionWrite, PermMembersRead, RequirePermission},
    },
    models::{
        event::DateRangeFilter,
        intercession::{CreateIntercessionLogPayload, IntercessionLog},
    },
};

// POST /api/intercession/logs
#[utoipa::path(
    post,
    path = "/api/intercession/logs",
    tag = "Intercession",
    request_body = CreateIntercessionLogPayload,
    responses(
        (status = 201, description = "Participação marcada", body = IntercessionLog),
        (status = 404, description = "Membro não encontrado"),
        (status = 409, description = "Participação já marcada nesse dia")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_log(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermIntercessionWrite>,
    Json(payload): Json<CreateIntercessionLogPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let log = app_state.intercession_service
        .mark(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(log)))
}

// GET /api/intercession/logs?from=...&to=...
#[utoipa::path(
    get,
    path = "/api/intercession/logs",
    tag = "Intercession",
    params(
        ("from" = Option<String>, Query, description = "Data inicial (AAAA-MM-DD)"),
        ("to" = Option<String>, Query, description = "Data final (AAAA-MM-DD)")
    ),
    responses((status = 200, description = "Registros de intercessão", body = Vec<IntercessionLog>)),
    security(("api_jwt" = []))
)]
pub async fn list_logs(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMembersRead>,
    Query(range): Query<DateRangeFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let logs = app_state.intercession_service
        .list(range.from, range.to)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(logs))
}

// DELETE /api/intercession/logs/{id}
#[utoipa::path(
    delete,
    path = "/api/intercession/logs/{id}",
    tag = "Intercession",
    params(("id" = Uuid, Path, description = "ID do registro")),
    responses(
        (status = 204, description = "Participação desmarcada"),
        (status = 404, description = "Registro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_log(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermIntercessionWrite>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.intercession_service
        .unmark(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
