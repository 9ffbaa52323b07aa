// src/services/indicators.rs

//! Classificador dos semáforos espirituais de um membro.
//!
//! Função pura: recebe todas as coleções já em memória e o "agora" explícito,
//! e devolve o membro com os três níveis recalculados. Quem chama decide quando
//! rodar e onde gravar.

use std::borrow::Cow;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{
    epmi::{EpmiEnrollment, EpmiStatus},
    event::{AttendanceMarks, Event},
    finance::FinanceTransaction,
    indicator::{IndicatorLevel, MemberIndicators},
    intercession::IntercessionLog,
    member::Member,
    mission::MissionTrip,
};

/// Quantos cultos/aulas recentes entram no cálculo de assistência.
pub const RECENT_EVENTS: usize = 8;

/// Janela (em dias) de fidelidade e de jejum/oração.
pub const LOOKBACK_DAYS: i64 = 60;

/// Registros de intercessão na janela que já valem como serviço (~2 por mês).
pub const FASTING_THRESHOLD: usize = 4;

/// As coleções lidas pelo classificador.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorInputs<'a> {
    pub members: &'a [Member],
    pub events: &'a [Event],
    pub attendance: &'a AttendanceMarks,
    pub transactions: &'a [FinanceTransaction],
    pub trips: &'a [MissionTrip],
    pub enrollments: &'a [EpmiEnrollment],
    pub intercession_logs: &'a [IntercessionLog],
}

/// Recalcula os três níveis do membro.
///
/// - `None`: o membro não existe em `inputs.members` (nada a fazer).
/// - `Some(Cow::Borrowed(_))`: níveis iguais aos gravados; é a mesma referência de entrada.
/// - `Some(Cow::Owned(_))`: pelo menos um nível mudou.
pub fn classify<'a>(
    member_id: Uuid,
    inputs: &IndicatorInputs<'a>,
    now: DateTime<Utc>,
) -> Option<Cow<'a, Member>> {
    let members: &'a [Member] = inputs.members;
    let member = members.iter().find(|m| m.id == member_id)?;

    let window = LookbackWindow::ending_at(now);
    let computed = MemberIndicators {
        attendance_level: attendance_level(member, inputs.events, inputs.attendance),
        fidelity_level: fidelity_level(member.id, inputs.transactions, &window),
        service_level: service_level(member, inputs.trips, inputs.enrollments, inputs.intercession_logs, &window),
    };

    if member.indicators() == computed {
        return Some(Cow::Borrowed(member));
    }

    let mut updated = member.clone();
    updated.set_indicators(computed);
    Some(Cow::Owned(updated))
}

// =========================================================================
//  JANELA
// =========================================================================

/// Intervalo fechado [hoje - 60 dias, hoje].
///
/// "Hoje" é o dia civil em UTC, não o fuso da igreja: às 21h em Brasília
/// (UTC-3) a janela já andou para o dia seguinte. As datas gravadas
/// (`transaction_date`, `log_date`) são comparadas contra esse dia.
#[derive(Debug, Clone, Copy)]
pub struct LookbackWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl LookbackWindow {
    pub fn ending_at(now: DateTime<Utc>) -> Self {
        let end = now.date_naive();
        Self {
            start: end - Duration::days(LOOKBACK_DAYS),
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

// =========================================================================
//  ASSISTÊNCIA
// =========================================================================

pub fn attendance_level(member: &Member, events: &[Event], attendance: &AttendanceMarks) -> IndicatorLevel {
    // Evento de "todos os anexos" (None) vale para qualquer membro
    let mut relevant: Vec<&Event> = events
        .iter()
        .filter(|e| e.event_type.counts_for_attendance())
        .filter(|e| e.anexo_id.is_none() || e.anexo_id == member.anexo_id)
        .collect();

    // Ordem total: dois cultos no mesmo dia não podem depender da ordem de leitura
    relevant.sort_by(|a, b| {
        b.event_date
            .cmp(&a.event_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
    });
    relevant.truncate(RECENT_EVENTS);

    // Sem eventos não há como faltar
    if relevant.is_empty() {
        return level_for_percentage(100.0);
    }

    let attended = relevant
        .iter()
        .filter(|e| attendance.was_present(e.id, member.id))
        .count();

    level_for_percentage(attended as f64 / relevant.len() as f64 * 100.0)
}

/// Quatro faixas semiabertas: <25, [25,50), [50,75), >=75.
pub fn level_for_percentage(percentage: f64) -> IndicatorLevel {
    if percentage < 25.0 {
        IndicatorLevel::Red
    } else if percentage < 50.0 {
        IndicatorLevel::Orange
    } else if percentage < 75.0 {
        IndicatorLevel::Yellow
    } else {
        IndicatorLevel::Green
    }
}

// =========================================================================
//  FIDELIDADE
// =========================================================================

pub fn fidelity_level(member_id: Uuid, transactions: &[FinanceTransaction], window: &LookbackWindow) -> IndicatorLevel {
    let count = transactions
        .iter()
        .filter(|t| t.member_id == Some(member_id))
        .filter(|t| window.contains(t.transaction_date))
        .count();

    // Não existe laranja na fidelidade
    match count {
        0 => IndicatorLevel::Red,
        1 => IndicatorLevel::Yellow,
        _ => IndicatorLevel::Green,
    }
}

// =========================================================================
//  SERVIÇO
// =========================================================================

/// O piso é laranja: vermelho nunca é atribuído ao serviço.
pub fn service_level(
    member: &Member,
    trips: &[MissionTrip],
    enrollments: &[EpmiEnrollment],
    intercession_logs: &[IntercessionLog],
    window: &LookbackWindow,
) -> IndicatorLevel {
    let in_ministry = !member.ministry_ids.is_empty();

    let served_on_trip = trips
        .iter()
        .flat_map(|t| t.participants.iter())
        .any(|p| p.member_id == member.id && p.served());

    let active_epmi = enrollments
        .iter()
        .any(|e| e.member_id == member.id && e.status == EpmiStatus::Active);

    let recent_logs = intercession_logs
        .iter()
        .filter(|l| l.member_id == member.id && window.contains(l.log_date))
        .count();

    if served_on_trip || active_epmi || recent_logs >= FASTING_THRESHOLD {
        IndicatorLevel::Green
    } else if in_ministry || recent_logs > 0 {
        IndicatorLevel::Yellow
    } else {
        IndicatorLevel::Orange
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        event::{AttendanceMark, EventType},
        finance::TransactionType,
        intercession::IntercessionLogType,
        mission::{ParticipantStatus, TripParticipant},
    };
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 30, 15, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> NaiveDate {
        now().date_naive() - Duration::days(days)
    }

    fn member(anexo_id: Option<Uuid>) -> Member {
        Member {
            id: Uuid::new_v4(),
            full_name: "Ana Ruiz".into(),
            email: None,
            phone: None,
            birth_date: None,
            anexo_id,
            ministry_ids: vec![],
            attendance_level: IndicatorLevel::Green,
            fidelity_level: IndicatorLevel::Red,
            service_level: IndicatorLevel::Orange,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn event(event_type: EventType, days: i64, anexo_id: Option<Uuid>) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Culto".into(),
            event_type,
            event_date: days_ago(days),
            anexo_id,
            created_at: now(),
        }
    }

    fn services(count: i64, anexo_id: Option<Uuid>) -> Vec<Event> {
        (0..count).map(|i| event(EventType::Service, i * 7, anexo_id)).collect()
    }

    fn attend(marks: &mut AttendanceMarks, events: &[Event], member: &Member, how_many: usize) {
        for e in events.iter().take(how_many) {
            marks.mark(e.id, member.id, true);
        }
    }

    fn donation(member_id: Option<Uuid>, days: i64) -> FinanceTransaction {
        FinanceTransaction {
            id: Uuid::new_v4(),
            member_id,
            amount: Decimal::new(5000, 2),
            transaction_type: TransactionType::Tithe,
            transaction_date: days_ago(days),
            description: None,
            created_at: now(),
        }
    }

    fn log(member_id: Uuid, days: i64) -> IntercessionLog {
        IntercessionLog {
            id: Uuid::new_v4(),
            member_id,
            log_type: IntercessionLogType::WeeklyMeeting,
            log_date: days_ago(days),
            created_at: now(),
        }
    }

    fn logs(member_id: Uuid, count: i64) -> Vec<IntercessionLog> {
        (0..count).map(|i| log(member_id, i * 5)).collect()
    }

    fn enrollment(member_id: Uuid, status: EpmiStatus) -> EpmiEnrollment {
        EpmiEnrollment {
            id: Uuid::new_v4(),
            member_id,
            status,
            cycle: "2025-1".into(),
            enrolled_at: days_ago(90),
        }
    }

    fn trip(participants: Vec<TripParticipant>) -> MissionTrip {
        MissionTrip {
            id: Uuid::new_v4(),
            name: "Missão Sertão".into(),
            destination: None,
            start_date: days_ago(200),
            end_date: None,
            participants,
            created_at: now(),
        }
    }

    fn participant(member_id: Uuid, status: ParticipantStatus, attended: bool) -> TripParticipant {
        TripParticipant { trip_id: Uuid::new_v4(), member_id, status, attended }
    }

    fn window() -> LookbackWindow {
        LookbackWindow::ending_at(now())
    }

    struct Fixture {
        members: Vec<Member>,
        events: Vec<Event>,
        attendance: AttendanceMarks,
        transactions: Vec<FinanceTransaction>,
        trips: Vec<MissionTrip>,
        enrollments: Vec<EpmiEnrollment>,
        logs: Vec<IntercessionLog>,
    }

    impl Fixture {
        fn new(member: Member) -> Self {
            Self {
                members: vec![member],
                events: vec![],
                attendance: AttendanceMarks::new(),
                transactions: vec![],
                trips: vec![],
                enrollments: vec![],
                logs: vec![],
            }
        }

        fn inputs(&self) -> IndicatorInputs<'_> {
            IndicatorInputs {
                members: &self.members,
                events: &self.events,
                attendance: &self.attendance,
                transactions: &self.transactions,
                trips: &self.trips,
                enrollments: &self.enrollments,
                intercession_logs: &self.logs,
            }
        }

        fn classify(&self) -> Member {
            let id = self.members[0].id;
            classify(id, &self.inputs(), now()).expect("membro existe").into_owned()
        }
    }

    // --- assistência ---

    #[test]
    fn six_of_eight_is_green() {
        let m = member(None);
        let events = services(8, None);
        let mut marks = AttendanceMarks::new();
        attend(&mut marks, &events, &m, 6);

        assert_eq!(attendance_level(&m, &events, &marks), IndicatorLevel::Green);
    }

    #[test]
    fn one_of_eight_is_red() {
        let m = member(None);
        let events = services(8, None);
        let mut marks = AttendanceMarks::new();
        attend(&mut marks, &events, &m, 1);

        assert_eq!(attendance_level(&m, &events, &marks), IndicatorLevel::Red);
    }

    #[test]
    fn no_qualifying_events_is_green_even_with_absences() {
        let m = member(Some(Uuid::new_v4()));
        // Outro anexo e tipos que não contam
        let events = vec![
            event(EventType::Service, 1, Some(Uuid::new_v4())),
            event(EventType::Meeting, 2, None),
            event(EventType::Special, 3, None),
        ];
        let mut marks = AttendanceMarks::new();
        for e in &events {
            marks.mark(e.id, m.id, false);
        }

        assert_eq!(attendance_level(&m, &events, &marks), IndicatorLevel::Green);
    }

    #[test]
    fn four_tier_thresholds() {
        assert_eq!(level_for_percentage(0.0), IndicatorLevel::Red);
        assert_eq!(level_for_percentage(24.9), IndicatorLevel::Red);
        assert_eq!(level_for_percentage(25.0), IndicatorLevel::Orange);
        assert_eq!(level_for_percentage(49.9), IndicatorLevel::Orange);
        assert_eq!(level_for_percentage(50.0), IndicatorLevel::Yellow);
        assert_eq!(level_for_percentage(74.9), IndicatorLevel::Yellow);
        assert_eq!(level_for_percentage(75.0), IndicatorLevel::Green);
        assert_eq!(level_for_percentage(100.0), IndicatorLevel::Green);
    }

    #[test]
    fn only_the_eight_most_recent_events_count() {
        let m = member(None);
        // 12 cultos semanais; o membro só foi aos 4 mais antigos
        let events = services(12, None);
        let mut marks = AttendanceMarks::new();
        for e in events.iter().skip(8) {
            marks.mark(e.id, m.id, true);
        }

        assert_eq!(attendance_level(&m, &events, &marks), IndicatorLevel::Red);
    }

    #[test]
    fn fewer_than_eight_events_use_the_real_count() {
        let m = member(None);
        let events = services(2, None);
        let mut marks = AttendanceMarks::new();
        attend(&mut marks, &events, &m, 1);

        // 1 de 2 = 50%
        assert_eq!(attendance_level(&m, &events, &marks), IndicatorLevel::Yellow);
    }

    #[test]
    fn events_for_all_anexos_count_for_everyone() {
        let anexo = Uuid::new_v4();
        let m = member(Some(anexo));
        let mut events = services(2, None);
        events.push(event(EventType::ClassCourse, 3, Some(anexo)));
        events.push(event(EventType::Service, 4, Some(Uuid::new_v4())));
        let mut marks = AttendanceMarks::new();
        attend(&mut marks, &events, &m, 1);

        // 1 de 3 relevantes = 33%
        assert_eq!(attendance_level(&m, &events, &marks), IndicatorLevel::Orange);
    }

    #[test]
    fn unordered_input_is_sorted_by_date() {
        let m = member(None);
        let mut events = services(10, None);
        let mut marks = AttendanceMarks::new();
        // Presente nos 8 mais recentes, ausente nos 2 mais antigos
        attend(&mut marks, &events, &m, 8);
        events.reverse();

        assert_eq!(attendance_level(&m, &events, &marks), IndicatorLevel::Green);
    }

    #[test]
    fn same_day_events_at_the_cutoff_do_not_depend_on_input_order() {
        let m = member(None);
        let mut events = services(7, None);
        let mut marks = AttendanceMarks::new();
        attend(&mut marks, &events, &m, 5);

        // Dois cultos no mesmo dia disputam a 8ª vaga; vence o cadastrado por último
        let mut later = event(EventType::Service, 49, None);
        let mut earlier = event(EventType::Service, 49, None);
        later.created_at = now();
        earlier.created_at = now() - Duration::hours(2);
        marks.mark(earlier.id, m.id, true);

        let mut forward = events.clone();
        forward.extend([later.clone(), earlier.clone()]);
        events.extend([earlier, later]);

        // 5 de 8: o culto em que o membro esteve fica de fora nas duas ordens
        assert_eq!(attendance_level(&m, &forward, &marks), IndicatorLevel::Yellow);
        assert_eq!(attendance_level(&m, &events, &marks), IndicatorLevel::Yellow);
    }

    #[test]
    fn false_mark_counts_as_absent() {
        let m = member(None);
        let events = services(4, None);
        let mut marks = AttendanceMarks::new();
        for e in &events {
            marks.mark(e.id, m.id, false);
        }
        marks.mark(events[0].id, m.id, true);

        assert_eq!(attendance_level(&m, &events, &marks), IndicatorLevel::Orange);
    }

    // --- fidelidade ---

    #[test]
    fn two_recent_transactions_are_green() {
        let id = Uuid::new_v4();
        let txs = vec![donation(Some(id), 10), donation(Some(id), 40)];
        assert_eq!(fidelity_level(id, &txs, &window()), IndicatorLevel::Green);
    }

    #[test]
    fn fidelity_has_no_orange() {
        let id = Uuid::new_v4();
        assert_eq!(fidelity_level(id, &[], &window()), IndicatorLevel::Red);
        assert_eq!(fidelity_level(id, &[donation(Some(id), 3)], &window()), IndicatorLevel::Yellow);
    }

    #[test]
    fn window_includes_day_sixty_and_excludes_day_sixty_one() {
        let id = Uuid::new_v4();
        assert_eq!(fidelity_level(id, &[donation(Some(id), 60)], &window()), IndicatorLevel::Yellow);
        assert_eq!(fidelity_level(id, &[donation(Some(id), 61)], &window()), IndicatorLevel::Red);
    }

    #[test]
    fn window_follows_the_utc_calendar_day() {
        let id = Uuid::new_v4();
        // 23:30 UTC de 30/06 ainda é 30/06; 00:30 UTC de 01/07 já é o dia seguinte
        let late = LookbackWindow::ending_at(Utc.with_ymd_and_hms(2025, 6, 30, 23, 30, 0).unwrap());
        let past_midnight = LookbackWindow::ending_at(Utc.with_ymd_and_hms(2025, 7, 1, 0, 30, 0).unwrap());

        let edge = donation(Some(id), 60);
        assert_eq!(edge.transaction_date, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert_eq!(fidelity_level(id, &[edge.clone()], &late), IndicatorLevel::Yellow);
        assert_eq!(fidelity_level(id, &[edge], &past_midnight), IndicatorLevel::Red);

        let tomorrow = donation(Some(id), -1);
        assert_eq!(fidelity_level(id, &[tomorrow.clone()], &late), IndicatorLevel::Red);
        assert_eq!(fidelity_level(id, &[tomorrow], &past_midnight), IndicatorLevel::Yellow);
    }

    #[test]
    fn future_dated_transactions_are_outside_the_window() {
        let id = Uuid::new_v4();
        let txs = vec![donation(Some(id), -1), donation(Some(id), -30)];
        assert_eq!(fidelity_level(id, &txs, &window()), IndicatorLevel::Red);
    }

    #[test]
    fn anonymous_and_foreign_transactions_are_ignored() {
        let id = Uuid::new_v4();
        let txs = vec![donation(None, 1), donation(Some(Uuid::new_v4()), 2)];
        assert_eq!(fidelity_level(id, &txs, &window()), IndicatorLevel::Red);
    }

    // --- serviço ---

    #[test]
    fn three_logs_without_ministry_is_yellow() {
        let m = member(None);
        let l = logs(m.id, 3);
        assert_eq!(service_level(&m, &[], &[], &l, &window()), IndicatorLevel::Yellow);
    }

    #[test]
    fn five_logs_without_ministry_is_green() {
        let m = member(None);
        let l = logs(m.id, 5);
        assert_eq!(service_level(&m, &[], &[], &l, &window()), IndicatorLevel::Green);
    }

    #[test]
    fn old_logs_do_not_count() {
        let m = member(None);
        let l: Vec<IntercessionLog> = (61..70).map(|d| log(m.id, d)).collect();
        assert_eq!(service_level(&m, &[], &[], &l, &window()), IndicatorLevel::Orange);
    }

    #[test]
    fn active_epmi_beats_missing_ministry() {
        let m = member(None);
        let e = vec![enrollment(m.id, EpmiStatus::Active)];
        assert_eq!(service_level(&m, &[], &e, &[], &window()), IndicatorLevel::Green);
    }

    #[test]
    fn withdrawn_epmi_does_not_count() {
        let m = member(None);
        let e = vec![enrollment(m.id, EpmiStatus::Withdrawn)];
        assert_eq!(service_level(&m, &[], &e, &[], &window()), IndicatorLevel::Orange);
    }

    #[test]
    fn ministry_alone_is_yellow() {
        let mut m = member(None);
        m.ministry_ids.push(Uuid::new_v4());
        assert_eq!(service_level(&m, &[], &[], &[], &window()), IndicatorLevel::Yellow);
    }

    #[test]
    fn trip_needs_approval_and_attendance() {
        let m = member(None);
        let proposed = vec![trip(vec![participant(m.id, ParticipantStatus::Proposed, true)])];
        let absent = vec![trip(vec![participant(m.id, ParticipantStatus::Approved, false)])];
        let served = vec![
            trip(vec![participant(m.id, ParticipantStatus::Rejected, false)]),
            trip(vec![participant(m.id, ParticipantStatus::Approved, true)]),
        ];

        assert_eq!(service_level(&m, &proposed, &[], &[], &window()), IndicatorLevel::Orange);
        assert_eq!(service_level(&m, &absent, &[], &[], &window()), IndicatorLevel::Orange);
        assert_eq!(service_level(&m, &served, &[], &[], &window()), IndicatorLevel::Green);
    }

    #[test]
    fn service_is_never_red() {
        let m = member(None);
        let other = Uuid::new_v4();
        let trips = vec![trip(vec![participant(other, ParticipantStatus::Approved, true)])];
        let e = vec![enrollment(other, EpmiStatus::Active)];
        let l = logs(other, 6);

        assert_eq!(service_level(&m, &[], &[], &[], &window()), IndicatorLevel::Orange);
        assert_eq!(service_level(&m, &trips, &e, &l, &window()), IndicatorLevel::Orange);
    }

    // --- classify ---

    #[test]
    fn unknown_member_is_a_no_op() {
        let fixture = Fixture::new(member(None));
        assert!(classify(Uuid::new_v4(), &fixture.inputs(), now()).is_none());
    }

    #[test]
    fn unchanged_levels_return_the_same_record() {
        // Defaults do membro: GREEN / RED / ORANGE, que é exatamente o cálculo sem dados
        let fixture = Fixture::new(member(None));
        let result = classify(fixture.members[0].id, &fixture.inputs(), now()).unwrap();

        match result {
            Cow::Borrowed(m) => assert!(std::ptr::eq(m, &fixture.members[0])),
            Cow::Owned(_) => panic!("não deveria ter criado um novo registro"),
        }
    }

    #[test]
    fn changed_levels_produce_a_new_record() {
        let m = member(None);
        let id = m.id;
        let mut fixture = Fixture::new(m);
        fixture.transactions = vec![donation(Some(id), 5), donation(Some(id), 20)];
        fixture.logs = logs(id, 1);

        let updated = fixture.classify();
        assert_eq!(updated.fidelity_level, IndicatorLevel::Green);
        assert_eq!(updated.service_level, IndicatorLevel::Yellow);
        assert_eq!(updated.attendance_level, IndicatorLevel::Green);
        assert_eq!(updated.full_name, fixture.members[0].full_name);
        assert_eq!(updated.updated_at, fixture.members[0].updated_at);
    }

    #[test]
    fn classification_is_idempotent() {
        let m = member(None);
        let id = m.id;
        let mut fixture = Fixture::new(m);
        fixture.events = services(8, None);
        let events = fixture.events.clone();
        let marks: AttendanceMarks = events
            .iter()
            .take(3)
            .map(|e| AttendanceMark { event_id: e.id, member_id: id, present: true })
            .collect();
        fixture.attendance = marks;
        fixture.transactions = vec![donation(Some(id), 1)];
        fixture.enrollments = vec![enrollment(id, EpmiStatus::Active)];

        let first = fixture.classify();
        assert_eq!(first.attendance_level, IndicatorLevel::Orange);

        fixture.members = vec![first.clone()];
        let second = classify(id, &fixture.inputs(), now()).unwrap();
        assert!(matches!(second, Cow::Borrowed(_)));
        assert_eq!(second.into_owned(), first);
    }

    #[test]
    fn other_members_records_do_not_leak() {
        let m = member(None);
        let id = m.id;
        let other = member(None);
        let other_id = other.id;
        let mut fixture = Fixture::new(m);
        fixture.members.push(other);
        fixture.transactions = vec![donation(Some(other_id), 1), donation(Some(other_id), 2)];
        fixture.logs = logs(other_id, 5);

        let result = classify(id, &fixture.inputs(), now()).unwrap();
        assert!(matches!(result, Cow::Borrowed(_)));
    }
}
