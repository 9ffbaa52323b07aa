// src/services/indicator_service.rs

use std::borrow::Cow;
use std::time::Duration;

use chrono::Utc;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        member_repo::LevelColumn, EpmiRepository, EventRepository, FinanceRepository,
        IntercessionRepository, MemberRepository, MissionRepository,
    },
    models::{
        event::AttendanceMarks,
        indicator::{IndicatorSummary, MemberIndicators, RecomputeReport},
        member::Member,
    },
    services::indicators::{self, IndicatorInputs},
};

#[derive(Clone)]
pub struct IndicatorService {
    member_repo: MemberRepository,
    event_repo: EventRepository,
    finance_repo: FinanceRepository,
    intercession_repo: IntercessionRepository,
    mission_repo: MissionRepository,
    epmi_repo: EpmiRepository,
    pool: PgPool,
}

/// O que aconteceu com um membro após a reclassificação.
#[derive(Debug)]
pub enum Refresh {
    Changed(Member),
    Unchanged(Member),
}

impl Refresh {
    pub fn from_classification(result: Cow<'_, Member>) -> Self {
        match result {
            Cow::Owned(updated) => Refresh::Changed(updated),
            Cow::Borrowed(same) => Refresh::Unchanged(same.clone()),
        }
    }

    /// Níveis a gravar. `None` quando nada mudou: sem UPDATE redundante.
    pub fn pending_write(&self) -> Option<MemberIndicators> {
        match self {
            Refresh::Changed(m) => Some(m.indicators()),
            Refresh::Unchanged(_) => None,
        }
    }

    pub fn into_member(self) -> Member {
        match self {
            Refresh::Changed(m) | Refresh::Unchanged(m) => m,
        }
    }
}

/// Contabiliza um membro da varredura. Falha de um membro não interrompe os demais.
pub fn record_outcome(
    report: &mut RecomputeReport,
    member_id: Uuid,
    outcome: Result<Option<Refresh>, AppError>,
) {
    report.evaluated += 1;
    match outcome {
        Ok(Some(Refresh::Changed(_))) => report.changed += 1,
        Ok(_) => {}
        Err(e) => {
            report.failed += 1;
            tracing::error!(%member_id, error = %e, "falha ao reclassificar membro");
        }
    }
}

impl IndicatorService {
    pub fn new(
        member_repo: MemberRepository,
        event_repo: EventRepository,
        finance_repo: FinanceRepository,
        intercession_repo: IntercessionRepository,
        mission_repo: MissionRepository,
        epmi_repo: EpmiRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            member_repo,
            event_repo,
            finance_repo,
            intercession_repo,
            mission_repo,
            epmi_repo,
            pool,
        }
    }

    /// Transação compartilhada entre a mutação e a reclassificação.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, AppError> {
        Ok(self.pool.begin().await?)
    }

    /// Trava a linha do membro na transação corrente.
    ///
    /// Quem vai inserir algo que referencia o membro chama isto antes da escrita,
    /// para que recomputações do mesmo membro sempre peguem os locks na mesma ordem.
    pub async fn lock_member(&self, conn: &mut PgConnection, member_id: Uuid) -> Result<Option<Member>, AppError> {
        self.member_repo.lock_by_id(conn, member_id).await
    }

    /// Recalcula e grava os semáforos dentro da transação de quem chama.
    ///
    /// Não faz commit: a mutação que motivou a reclassificação e a gravação dos
    /// níveis entram juntas ou não entram. Membro inexistente devolve `Ok(None)`.
    pub async fn refresh_in(&self, conn: &mut PgConnection, member_id: Uuid) -> Result<Option<Refresh>, AppError> {
        let Some(member) = self.member_repo.lock_by_id(&mut *conn, member_id).await? else {
            tracing::debug!(%member_id, "membro inexistente, reclassificação ignorada");
            return Ok(None);
        };

        // Lê tudo o que o classificador precisa para este membro
        let events = self.event_repo.list_attendance_events(&mut *conn, member.anexo_id).await?;
        let attendance: AttendanceMarks = self
            .event_repo
            .list_member_attendance(&mut *conn, member_id)
            .await?
            .into_iter()
            .collect();
        let transactions = self.finance_repo.list_by_member(&mut *conn, member_id).await?;
        let trips = self.mission_repo.list_trips_for_member(&mut *conn, member_id).await?;
        let enrollments = self.epmi_repo.list_by_member(&mut *conn, member_id).await?;
        let intercession_logs = self.intercession_repo.list_by_member(&mut *conn, member_id).await?;

        let members = [member];
        let inputs = IndicatorInputs {
            members: &members,
            events: &events,
            attendance: &attendance,
            transactions: &transactions,
            trips: &trips,
            enrollments: &enrollments,
            intercession_logs: &intercession_logs,
        };

        let Some(classified) = indicators::classify(member_id, &inputs, Utc::now()) else {
            return Ok(None);
        };
        let refresh = Refresh::from_classification(classified);

        match refresh.pending_write() {
            Some(levels) => {
                self.member_repo.update_indicators(&mut *conn, member_id, levels).await?;
                tracing::info!(
                    %member_id,
                    attendance = ?levels.attendance_level,
                    fidelity = ?levels.fidelity_level,
                    service = ?levels.service_level,
                    "semáforos atualizados"
                );
            }
            None => tracing::debug!(%member_id, "semáforos inalterados"),
        }

        Ok(Some(refresh))
    }

    /// Reclassificação isolada (painel, varredura): abre e fecha a própria transação.
    pub async fn refresh_member(&self, member_id: Uuid) -> Result<Option<Refresh>, AppError> {
        let mut tx = self.pool.begin().await?;
        let refresh = self.refresh_in(&mut *tx, member_id).await?;
        tx.commit().await?;
        Ok(refresh)
    }

    /// Varre todos os membros. As janelas deslizam com o tempo,
    /// então os níveis podem mudar mesmo sem novos registros.
    pub async fn refresh_all(&self) -> Result<RecomputeReport, AppError> {
        let ids = self.member_repo.list_ids(&self.pool).await?;

        let mut report = RecomputeReport::default();
        for id in ids {
            let outcome = self.refresh_member(id).await;
            record_outcome(&mut report, id, outcome);
        }

        tracing::info!(
            evaluated = report.evaluated,
            changed = report.changed,
            failed = report.failed,
            "varredura de semáforos concluída"
        );
        Ok(report)
    }

    pub async fn summary(&self) -> Result<IndicatorSummary, AppError> {
        let mut summary = IndicatorSummary {
            total_members: self.member_repo.count(&self.pool).await?,
            ..Default::default()
        };

        for (column, counts) in [
            (LevelColumn::Attendance, &mut summary.attendance),
            (LevelColumn::Fidelity, &mut summary.fidelity),
            (LevelColumn::Service, &mut summary.service),
        ] {
            for (level, total) in self.member_repo.count_by_level(&self.pool, column).await? {
                counts.add(level, total);
            }
        }

        Ok(summary)
    }

    /// Dispara a varredura periódica em segundo plano.
    pub fn spawn_sweeper(self, every: Duration) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            // O primeiro tick é imediato; a varredura inicial roda na subida
            loop {
                interval.tick().await;
                if let Err(e) = self.refresh_all().await {
                    tracing::error!(error = %e, "falha na varredura de semáforos");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::indicator::IndicatorLevel;

    fn member() -> Member {
        Member {
            id: Uuid::new_v4(),
            full_name: "Davi Ramos".into(),
            email: None,
            phone: None,
            birth_date: None,
            anexo_id: None,
            ministry_ids: vec![],
            attendance_level: IndicatorLevel::Green,
            fidelity_level: IndicatorLevel::Red,
            service_level: IndicatorLevel::Orange,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // Sem eventos, lançamentos nem serviço: os níveis padrão do cadastro já estão certos
    fn classify_alone(m: &Member) -> Refresh {
        let members = std::slice::from_ref(m);
        let attendance = AttendanceMarks::new();
        let inputs = IndicatorInputs {
            members,
            events: &[],
            attendance: &attendance,
            transactions: &[],
            trips: &[],
            enrollments: &[],
            intercession_logs: &[],
        };
        Refresh::from_classification(indicators::classify(m.id, &inputs, Utc::now()).expect("membro existe"))
    }

    #[test]
    fn unchanged_levels_are_not_written() {
        let m = member();
        let refresh = classify_alone(&m);

        assert!(matches!(refresh, Refresh::Unchanged(_)));
        assert_eq!(refresh.pending_write(), None);
    }

    #[test]
    fn changed_levels_are_written_once() {
        let mut m = member();
        m.fidelity_level = IndicatorLevel::Green;

        let refresh = classify_alone(&m);
        let levels = refresh.pending_write().expect("nível mudou");
        assert_eq!(levels.fidelity_level, IndicatorLevel::Red);

        // Com o valor já gravado, a segunda passada não escreve nada
        let stored = refresh.into_member();
        assert_eq!(classify_alone(&stored).pending_write(), None);
    }

    #[test]
    fn sweep_counts_changes_and_keeps_going_after_a_failure() {
        let mut report = RecomputeReport::default();

        record_outcome(&mut report, Uuid::new_v4(), Ok(Some(Refresh::Changed(member()))));
        record_outcome(&mut report, Uuid::new_v4(), Err(AppError::InternalServerError(anyhow::anyhow!("pool esgotado"))));
        record_outcome(&mut report, Uuid::new_v4(), Ok(Some(Refresh::Unchanged(member()))));
        // Membro apagado entre a listagem e a reclassificação
        record_outcome(&mut report, Uuid::new_v4(), Ok(None));
        record_outcome(&mut report, Uuid::new_v4(), Ok(Some(Refresh::Changed(member()))));

        assert_eq!(report.evaluated, 5);
        assert_eq!(report.changed, 2);
        assert_eq!(report.failed, 1);
    }
}
