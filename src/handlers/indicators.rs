// src/handlers/indicators.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermIndicatorsManage, PermMembersRead, RequirePermission},
    },
    models::indicator::{IndicatorSummary, RecomputeReport},
};

// POST /api/indicators/recompute
#[utoipa::path(
    post,
    path = "/api/indicators/recompute",
    tag = "Indicators",
    responses((status = 200, description = "Todos os membros reclassificados", body = RecomputeReport)),
    security(("api_jwt" = []))
)]
pub async fn recompute_all(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermIndicatorsManage>,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state.indicator_service
        .refresh_all()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(report))
}

// GET /api/indicators/summary
#[utoipa::path(
    get,
    path = "/api/indicators/summary",
    tag = "Indicators",
    responses((status = 200, description = "Contagem de membros por nível", body = IndicatorSummary)),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermMembersRead>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state.indicator_service
        .summary()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}
