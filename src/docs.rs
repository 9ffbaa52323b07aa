// src/docs.rs

use axum::Json;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth / Users ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::update_user_role,

        // --- RBAC ---
        handlers::rbac::list_permissions,

        // --- Anexos ---
        handlers::anexos::create_anexo,
        handlers::anexos::list_anexos,

        // --- Members ---
        handlers::members::create_member,
        handlers::members::list_members,
        handlers::members::get_member,
        handlers::members::update_member,
        handlers::members::delete_member,
        handlers::members::refresh_member_indicators,
        handlers::members::join_ministry,
        handlers::members::leave_ministry,

        // --- Ministries ---
        handlers::ministries::create_ministry,
        handlers::ministries::list_ministries,
        handlers::ministries::list_ministry_members,

        // --- Events ---
        handlers::events::create_event,
        handlers::events::list_events,
        handlers::events::list_attendance,
        handlers::events::set_attendance,
        handlers::events::clear_attendance,

        // --- Finance ---
        handlers::finance::create_transaction,
        handlers::finance::list_transactions,
        handlers::finance::delete_transaction,

        // --- Intercession ---
        handlers::intercession::create_log,
        handlers::intercession::list_logs,
        handlers::intercession::delete_log,

        // --- Missions ---
        handlers::missions::create_trip,
        handlers::missions::list_trips,
        handlers::missions::propose_participant,
        handlers::missions::update_participant,

        // --- EPMI ---
        handlers::epmi::enroll,
        handlers::epmi::list_enrollments,
        handlers::epmi::update_enrollment_status,

        // --- Indicators ---
        handlers::indicators::recompute_all,
        handlers::indicators::get_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::UpdateRolePayload,
            models::auth::AuthResponse,

            // --- RBAC ---
            models::rbac::Role,
            models::rbac::RolePermissions,

            // --- Cadastro ---
            models::anexo::Anexo,
            models::anexo::CreateAnexoPayload,
            models::member::Member,
            models::member::CreateMemberPayload,
            models::member::UpdateMemberPayload,
            models::ministry::Ministry,
            models::ministry::CreateMinistryPayload,

            // --- Eventos ---
            models::event::EventType,
            models::event::Event,
            models::event::AttendanceMark,
            models::event::CreateEventPayload,
            models::event::SetAttendancePayload,

            // --- Finanças ---
            models::finance::TransactionType,
            models::finance::FinanceTransaction,
            models::finance::CreateTransactionPayload,

            // --- Intercessão ---
            models::intercession::IntercessionLogType,
            models::intercession::IntercessionLog,
            models::intercession::CreateIntercessionLogPayload,

            // --- Missões ---
            models::mission::ParticipantStatus,
            models::mission::TripParticipant,
            models::mission::MissionTrip,
            models::mission::CreateTripPayload,
            models::mission::ProposeParticipantPayload,
            models::mission::UpdateParticipantPayload,

            // --- EPMI ---
            models::epmi::EpmiStatus,
            models::epmi::EpmiEnrollment,
            models::epmi::EnrollPayload,
            models::epmi::UpdateEnrollmentStatusPayload,

            // --- Semáforos ---
            models::indicator::IndicatorLevel,
            models::indicator::LevelCounts,
            models::indicator::IndicatorSummary,
            models::indicator::RecomputeReport,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Papel"),
        (name = "RBAC", description = "Papéis e Permissões"),
        (name = "Anexos", description = "Locais da Igreja"),
        (name = "Members", description = "Cadastro de Membros e Semáforos"),
        (name = "Ministries", description = "Ministérios"),
        (name = "Events", description = "Cultos, Aulas e Presença"),
        (name = "Finance", description = "Dízimos, Ofertas e Doações"),
        (name = "Intercession", description = "Reuniões de Oração e Jejuns"),
        (name = "Missions", description = "Viagens Missionárias"),
        (name = "EPMI", description = "Escola de Formação Ministerial"),
        (name = "Indicators", description = "Semáforos de Acompanhamento")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

// GET /api/docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
