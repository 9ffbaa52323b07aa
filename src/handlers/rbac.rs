// src/handlers/rbac.rs

use axum::Json;

use crate::models::rbac::{Role, RolePermissions};

// GET /api/permissions (Para o frontend saber o que cada papel enxerga)
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "RBAC",
    responses(
        (status = 200, description = "Permissões de cada papel", body = Vec<RolePermissions>)
    )
)]
pub async fn list_permissions() -> Json<Vec<RolePermissions>> {
    let roles = [
        Role::Admin,
        Role::Pastor,
        Role::Secretary,
        Role::Treasurer,
        Role::Leader,
        Role::Member,
    ];

    let body = roles
        .into_iter()
        .map(|role| RolePermissions {
            role,
            permissions: role.permissions().iter().map(|p| p.to_string()).collect(),
        })
        .collect();

    Json(body)
}
