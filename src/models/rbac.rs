// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Mapeia o CREATE TYPE user_role do banco.
// Os papéis são fixos; cada um carrega um conjunto estático de permissões.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Pastor,
    Secretary,
    Treasurer,
    Leader,
    Member,
}

// --- PERMISSÕES ---

pub const MEMBERS_READ: &str = "members:read";
pub const MEMBERS_WRITE: &str = "members:write";
pub const ATTENDANCE_WRITE: &str = "attendance:write";
pub const FINANCE_READ: &str = "finance:read";
pub const FINANCE_WRITE: &str = "finance:write";
pub const INTERCESSION_WRITE: &str = "intercession:write";
pub const MISSIONS_WRITE: &str = "missions:write";
pub const EPMI_WRITE: &str = "epmi:write";
pub const MINISTRIES_WRITE: &str = "ministries:write";
pub const ANEXOS_WRITE: &str = "anexos:write";
pub const INDICATORS_MANAGE: &str = "indicators:manage";
pub const USERS_MANAGE: &str = "users:manage";

pub const ALL_PERMISSIONS: &[&str] = &[
    MEMBERS_READ,
    MEMBERS_WRITE,
    ATTENDANCE_WRITE,
    FINANCE_READ,
    FINANCE_WRITE,
    INTERCESSION_WRITE,
    MISSIONS_WRITE,
    EPMI_WRITE,
    MINISTRIES_WRITE,
    ANEXOS_WRITE,
    INDICATORS_MANAGE,
    USERS_MANAGE,
];

impl Role {
    pub fn permissions(self) -> &'static [&'static str] {
        match self {
            Role::Admin => ALL_PERMISSIONS,
            Role::Pastor => &[
                MEMBERS_READ,
                MEMBERS_WRITE,
                ATTENDANCE_WRITE,
                FINANCE_READ,
                INTERCESSION_WRITE,
                MISSIONS_WRITE,
                EPMI_WRITE,
                MINISTRIES_WRITE,
                INDICATORS_MANAGE,
            ],
            Role::Secretary => &[
                MEMBERS_READ,
                MEMBERS_WRITE,
                ATTENDANCE_WRITE,
                INTERCESSION_WRITE,
                EPMI_WRITE,
                MINISTRIES_WRITE,
            ],
            // Tesouraria vê membros só para vincular doações
            Role::Treasurer => &[MEMBERS_READ, FINANCE_READ, FINANCE_WRITE],
            Role::Leader => &[MEMBERS_READ, ATTENDANCE_WRITE, INTERCESSION_WRITE],
            Role::Member => &[],
        }
    }

    pub fn has_permission(self, slug: &str) -> bool {
        self.permissions().contains(&slug)
    }
}

// Resposta de GET /api/permissions
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissions {
    pub role: Role,
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_every_permission() {
        for slug in ALL_PERMISSIONS {
            assert!(Role::Admin.has_permission(slug), "admin sem {slug}");
        }
    }

    #[test]
    fn plain_member_has_nothing() {
        assert!(Role::Member.permissions().is_empty());
        assert!(!Role::Member.has_permission(MEMBERS_READ));
    }

    #[test]
    fn treasurer_cannot_touch_attendance() {
        assert!(Role::Treasurer.has_permission(FINANCE_WRITE));
        assert!(!Role::Treasurer.has_permission(ATTENDANCE_WRITE));
        assert!(!Role::Treasurer.has_permission(USERS_MANAGE));
    }

    #[test]
    fn only_admin_manages_users() {
        let managers: Vec<Role> = [
            Role::Admin,
            Role::Pastor,
            Role::Secretary,
            Role::Treasurer,
            Role::Leader,
            Role::Member,
        ]
        .into_iter()
        .filter(|r| r.has_permission(USERS_MANAGE))
        .collect();

        assert_eq!(managers, vec![Role::Admin]);
    }
}
