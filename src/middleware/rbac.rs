// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::rbac,
};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts.
// Deve vir depois do auth_guard, que coloca o AuthenticatedUser nos extensions.
impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        // A. Extrai Usuário
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store))?;

        // B. Confere o papel
        let required_perm = T::slug();
        if !user.0.role.has_permission(required_perm) {
            tracing::debug!(user_id = %user.0.id, role = ?user.0.role, permission = required_perm, "acesso negado");
            return Err(AppError::Forbidden(required_perm).to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

macro_rules! permission {
    ($name:ident, $slug:expr) => {
        pub struct $name;
        impl PermissionDef for $name {
            fn slug() -> &'static str {
                $slug
            }
        }
    };
}

permission!(PermMembersRead, rbac::MEMBERS_READ);
permission!(PermMembersWrite, rbac::MEMBERS_WRITE);
permission!(PermAttendanceWrite, rbac::ATTENDANCE_WRITE);
permission!(PermFinanceRead, rbac::FINANCE_READ);
permission!(PermFinanceWrite, rbac::FINANCE_WRITE);
permission!(PermIntercessionWrite, rbac::INTERCESSION_WRITE);
permission!(PermMissionsWrite, rbac::MISSIONS_WRITE);
permission!(PermEpmiWrite, rbac::EPMI_WRITE);
permission!(PermMinistriesWrite, rbac::MINISTRIES_WRITE);
permission!(PermAnexosWrite, rbac::ANEXOS_WRITE);
permission!(PermIndicatorsManage, rbac::INDICATORS_MANAGE);
permission!(PermUsersManage, rbac::USERS_MANAGE);
