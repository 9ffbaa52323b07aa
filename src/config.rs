// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    common::i18n::I18nStore,
    db::{
        AnexoRepository, EpmiRepository, EventRepository, FinanceRepository,
        IntercessionRepository, MemberRepository, MinistryRepository, MissionRepository,
        UserRepository,
    },
    services::{
        attendance_service::AttendanceService, auth::AuthService, epmi_service::EpmiService,
        finance_service::FinanceService, indicator_service::IndicatorService,
        intercession_service::IntercessionService, member_service::MemberService,
        mission_service::MissionService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SWEEP_SECS: u64 = 3600;

/// Configuração lida do ambiente (e do .env, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    // E-mail que recebe o papel ADMIN no cadastro
    pub bootstrap_admin_email: Option<String>,
    // 0 desliga a varredura periódica dos indicadores
    pub indicator_sweep_secs: u64,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v.parse().with_context(|| format!("DB_MAX_CONNECTIONS inválido: {v}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let indicator_sweep_secs = match lookup("INDICATOR_SWEEP_SECS") {
            Some(v) => v.parse().with_context(|| format!("INDICATOR_SWEEP_SECS inválido: {v}"))?,
            None => DEFAULT_SWEEP_SECS,
        };

        let bootstrap_admin_email = lookup("BOOTSTRAP_ADMIN_EMAIL")
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            db_max_connections,
            bootstrap_admin_email,
            indicator_sweep_secs,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Settings,
    pub i18n_store: I18nStore,

    pub auth_service: AuthService,
    pub indicator_service: IndicatorService,
    pub member_service: MemberService,
    pub attendance_service: AttendanceService,
    pub finance_service: FinanceService,
    pub intercession_service: IntercessionService,
    pub mission_service: MissionService,
    pub epmi_service: EpmiService,

    pub anexo_repo: AnexoRepository,
    pub ministry_repo: MinistryRepository,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, settings))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool, settings: Settings) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let anexo_repo = AnexoRepository::new(db_pool.clone());
        let member_repo = MemberRepository::new();
        let ministry_repo = MinistryRepository::new(db_pool.clone());
        let event_repo = EventRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new(db_pool.clone());
        let intercession_repo = IntercessionRepository::new(db_pool.clone());
        let mission_repo = MissionRepository::new(db_pool.clone());
        let epmi_repo = EpmiRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo,
            settings.jwt_secret.clone(),
            settings.bootstrap_admin_email.clone(),
        );

        let indicator_service = IndicatorService::new(
            member_repo.clone(),
            event_repo.clone(),
            finance_repo.clone(),
            intercession_repo.clone(),
            mission_repo.clone(),
            epmi_repo.clone(),
            db_pool.clone(),
        );

        let member_service = MemberService::new(
            member_repo,
            ministry_repo.clone(),
            indicator_service.clone(),
            db_pool.clone(),
        );
        let attendance_service = AttendanceService::new(event_repo, indicator_service.clone());
        let finance_service = FinanceService::new(finance_repo, indicator_service.clone());
        let intercession_service = IntercessionService::new(intercession_repo, indicator_service.clone());
        let mission_service = MissionService::new(mission_repo, indicator_service.clone(), db_pool.clone());
        let epmi_service = EpmiService::new(epmi_repo, indicator_service.clone());

        Self {
            db_pool,
            settings,
            i18n_store: I18nStore::new(),
            auth_service,
            indicator_service,
            member_service,
            attendance_service,
            finance_service,
            intercession_service,
            mission_service,
            epmi_service,
            anexo_repo,
            ministry_repo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/chms"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(settings.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(settings.db_max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(settings.indicator_sweep_secs, DEFAULT_SWEEP_SECS);
        assert!(settings.bootstrap_admin_email.is_none());
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = Settings::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/chms")]))
            .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn rejects_non_numeric_sweep_interval() {
        let result = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/chms"),
            ("JWT_SECRET", "segredo"),
            ("INDICATOR_SWEEP_SECS", "uma hora"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn normalizes_bootstrap_admin_email() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/chms"),
            ("JWT_SECRET", "segredo"),
            ("BOOTSTRAP_ADMIN_EMAIL", "  Pastor@Igreja.org "),
        ]))
        .unwrap();
        assert_eq!(settings.bootstrap_admin_email.as_deref(), Some("pastor@igreja.org"));
    }

    // O main lê intervalo da varredura e endereço do estado montado
    #[tokio::test]
    async fn state_carries_the_settings_main_reads() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/chms_test"),
            ("JWT_SECRET", "segredo"),
            ("BIND_ADDR", "127.0.0.1:4100"),
            ("INDICATOR_SWEEP_SECS", "0"),
        ]))
        .unwrap();
        let pool = PgPoolOptions::new()
            .connect_lazy(&settings.database_url)
            .expect("url válida");

        let state = AppState::with_pool(pool, settings);

        assert_eq!(state.settings.bind_addr, "127.0.0.1:4100");
        assert_eq!(state.settings.indicator_sweep_secs, 0);
    }
}
