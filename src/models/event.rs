// src/models/event.rs

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Mapeia o CREATE TYPE event_type do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "event_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Service,     // Culto
    ClassCourse, // Aula / Curso
    Meeting,     // Reunião
    Special,     // Evento especial
    Other,
}

impl EventType {
    /// Só cultos e aulas entram no cálculo de assistência.
    pub fn counts_for_attendance(self) -> bool {
        matches!(self, EventType::Service | EventType::ClassCourse)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,

    #[schema(example = "Culto de Domingo")]
    pub title: String,
    pub event_type: EventType,

    #[schema(value_type = String, format = Date, example = "2025-03-02")]
    pub event_date: NaiveDate,

    // None = evento para todos os anexos
    pub anexo_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

// --- PRESENÇA ---

// Uma linha da tabela attendance
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
    pub event_id: Uuid,
    pub member_id: Uuid,
    pub present: bool,
}

/// Mapa (evento, membro) -> presente. Chave ausente = "não registrado".
#[derive(Debug, Clone, Default)]
pub struct AttendanceMarks(HashMap<(Uuid, Uuid), bool>);

impl AttendanceMarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, event_id: Uuid, member_id: Uuid, present: bool) {
        self.0.insert((event_id, member_id), present);
    }

    /// Verdadeiro só quando existe marcação e ela é `true`.
    pub fn was_present(&self, event_id: Uuid, member_id: Uuid) -> bool {
        self.0.get(&(event_id, member_id)).copied().unwrap_or(false)
    }
}

impl FromIterator<AttendanceMark> for AttendanceMarks {
    fn from_iter<I: IntoIterator<Item = AttendanceMark>>(iter: I) -> Self {
        let mut marks = AttendanceMarks::new();
        for m in iter {
            marks.mark(m.event_id, m.member_id, m.present);
        }
        marks
    }
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventPayload {
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    pub event_type: EventType,

    #[schema(value_type = String, format = Date, example = "2025-03-02")]
    pub event_date: NaiveDate,
    pub anexo_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetAttendancePayload {
    pub member_id: Uuid,
    pub present: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_mark_counts_as_absent() {
        let event = Uuid::new_v4();
        let present = Uuid::new_v4();
        let absent = Uuid::new_v4();

        let marks: AttendanceMarks = vec![
            AttendanceMark { event_id: event, member_id: present, present: true },
            AttendanceMark { event_id: event, member_id: absent, present: false },
        ]
        .into_iter()
        .collect();

        assert!(marks.was_present(event, present));
        assert!(!marks.was_present(event, absent));
        assert!(!marks.was_present(event, Uuid::new_v4()));
    }

    #[test]
    fn only_services_and_classes_count() {
        assert!(EventType::Service.counts_for_attendance());
        assert!(EventType::ClassCourse.counts_for_attendance());
        assert!(!EventType::Meeting.counts_for_attendance());
        assert!(!EventType::Special.counts_for_attendance());
        assert!(!EventType::Other.counts_for_attendance());
    }
}
