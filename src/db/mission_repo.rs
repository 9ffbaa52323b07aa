// src/db/mission_repo.rs

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::mission::{CreateTripPayload, MissionTrip, ParticipantStatus, TripParticipant},
};

#[derive(Clone)]
pub struct MissionRepository {
    pool: PgPool,
}

impl MissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  VIAGENS
    // =========================================================================

    pub async fn create_trip(&self, input: &CreateTripPayload) -> Result<MissionTrip, AppError> {
        let trip = sqlx::query_as::<_, MissionTrip>(
            r#"
            INSERT INTO mission_trips (name, destination, start_date, end_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, destination, start_date, end_date, created_at
            "#,
        )
            .bind(&input.name)
            .bind(&input.destination)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(&self.pool)
            .await?;
        Ok(trip)
    }

    pub async fn list_trips(&self) -> Result<Vec<MissionTrip>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let trips = sqlx::query_as::<_, MissionTrip>(
            r#"
            SELECT id, name, destination, start_date, end_date, created_at
            FROM mission_trips
            ORDER BY start_date DESC
            "#,
        )
            .fetch_all(&mut *conn)
            .await?;

        self.with_participants(&mut *conn, trips).await
    }

    /// Viagens em que o membro aparece, com a lista completa de participantes.
    pub async fn list_trips_for_member(
        &self,
        conn: &mut PgConnection,
        member_id: Uuid,
    ) -> Result<Vec<MissionTrip>, AppError> {
        let trips = sqlx::query_as::<_, MissionTrip>(
            r#"
            SELECT t.id, t.name, t.destination, t.start_date, t.end_date, t.created_at
            FROM mission_trips t
            WHERE EXISTS (
                SELECT 1 FROM trip_participants p
                WHERE p.trip_id = t.id AND p.member_id = $1
            )
            "#,
        )
            .bind(member_id)
            .fetch_all(&mut *conn)
            .await?;

        self.with_participants(conn, trips).await
    }

    pub async fn trip_exists(&self, id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM mission_trips WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    // Preenche `participants` com uma única query para todas as viagens
    async fn with_participants(
        &self,
        conn: &mut PgConnection,
        mut trips: Vec<MissionTrip>,
    ) -> Result<Vec<MissionTrip>, AppError> {
        if trips.is_empty() {
            return Ok(trips);
        }

        let trip_ids: Vec<Uuid> = trips.iter().map(|t| t.id).collect();
        let participants = sqlx::query_as::<_, TripParticipant>(
            r#"
            SELECT trip_id, member_id, status, attended
            FROM trip_participants
            WHERE trip_id = ANY($1)
            "#,
        )
            .bind(&trip_ids)
            .fetch_all(&mut *conn)
            .await?;

        let mut by_trip: HashMap<Uuid, Vec<TripParticipant>> = HashMap::new();
        for p in participants {
            by_trip.entry(p.trip_id).or_default().push(p);
        }

        for trip in &mut trips {
            trip.participants = by_trip.remove(&trip.id).unwrap_or_default();
        }

        Ok(trips)
    }

    // =========================================================================
    //  PARTICIPANTES
    // =========================================================================

    pub async fn add_participant(&self, trip_id: Uuid, member_id: Uuid) -> Result<TripParticipant, AppError> {
        sqlx::query_as::<_, TripParticipant>(
            r#"
            INSERT INTO trip_participants (trip_id, member_id)
            VALUES ($1, $2)
            RETURNING trip_id, member_id, status, attended
            "#,
        )
            .bind(trip_id)
            .bind(member_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_db)
    }

    pub async fn lock_participant(
        &self,
        conn: &mut PgConnection,
        trip_id: Uuid,
        member_id: Uuid,
    ) -> Result<Option<TripParticipant>, AppError> {
        let participant = sqlx::query_as::<_, TripParticipant>(
            r#"
            SELECT trip_id, member_id, status, attended
            FROM trip_participants
            WHERE trip_id = $1 AND member_id = $2
            FOR UPDATE
            "#,
        )
            .bind(trip_id)
            .bind(member_id)
            .fetch_optional(conn)
            .await?;
        Ok(participant)
    }

    pub async fn update_participant(
        &self,
        conn: &mut PgConnection,
        trip_id: Uuid,
        member_id: Uuid,
        status: ParticipantStatus,
        attended: bool,
    ) -> Result<TripParticipant, AppError> {
        let participant = sqlx::query_as::<_, TripParticipant>(
            r#"
            UPDATE trip_participants SET status = $3, attended = $4
            WHERE trip_id = $1 AND member_id = $2
            RETURNING trip_id, member_id, status, attended
            "#,
        )
            .bind(trip_id)
            .bind(member_id)
            .bind(status)
            .bind(attended)
            .fetch_one(conn)
            .await?;
        Ok(participant)
    }
}
