// src/models/indicator.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Mapeia o CREATE TYPE indicator_level do banco.
// A ordem das variantes vai do melhor para o pior nível.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "indicator_level", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorLevel {
    Green,
    Yellow,
    Orange,
    Red,
}

/// Os três semáforos de um membro (assistência, fidelidade, serviço).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberIndicators {
    pub attendance_level: IndicatorLevel,
    pub fidelity_level: IndicatorLevel,
    pub service_level: IndicatorLevel,
}

// Contagem de membros por nível, para os cards do painel
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelCounts {
    pub green: i64,
    pub yellow: i64,
    pub orange: i64,
    pub red: i64,
}

impl LevelCounts {
    pub fn add(&mut self, level: IndicatorLevel, count: i64) {
        match level {
            IndicatorLevel::Green => self.green += count,
            IndicatorLevel::Yellow => self.yellow += count,
            IndicatorLevel::Orange => self.orange += count,
            IndicatorLevel::Red => self.red += count,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSummary {
    pub total_members: i64,
    pub attendance: LevelCounts,
    pub fidelity: LevelCounts,
    pub service: LevelCounts,
}

// Resultado de uma varredura completa
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeReport {
    pub evaluated: usize,
    pub changed: usize,
    // Membros cuja reclassificação falhou; ficam para a próxima varredura
    pub failed: usize,
}
