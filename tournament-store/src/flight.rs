//! implementation of the flight store port

use crate::{PgDb, map_db_err, schema::flights};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::{
    AsChangeset, ExpressionMethods, Insertable, OptionalExtension, QueryDsl, Queryable,
};
use diesel_async::RunQueryDsl;
use tournament_core::{DbError, DbResult, DbpFlight, Flight, FlightStatus};
use tracing::{debug, info, instrument};
use uuid::Uuid;

fn status_to_text(s: FlightStatus) -> &'static str {
    match s {
        FlightStatus::Open => "open",
        FlightStatus::Completed => "completed",
    }
}

fn status_from_text(s: &str) -> DbResult<FlightStatus> {
    match s {
        "open" => Ok(FlightStatus::Open),
        "completed" => Ok(FlightStatus::Completed),
        other => Err(DbError::Other(anyhow::anyhow!("unknown flight status {other}"))),
    }
}

#[derive(Debug, Queryable)]
struct DbFlight {
    id: Uuid,
    version: i64,
    tournament_id: Uuid,
    flight_number: i32,
    status: String,
    notes: Option<String>,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl TryFrom<DbFlight> for Flight {
    type Error = DbError;

    fn try_from(r: DbFlight) -> Result<Self, Self::Error> {
        Ok(Flight {
            id: r.id,
            tournament_id: r.tournament_id,
            flight_number: r.flight_number as u32,
            status: status_from_text(&r.status)?,
            notes: r.notes,
            version: r.version,
        })
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = flights)]
struct WriteDbFlight<'a> {
    id: Uuid,
    tournament_id: Uuid,
    flight_number: i32,
    status: &'static str,
    notes: Option<&'a str>,
}

impl<'a> From<&'a Flight> for WriteDbFlight<'a> {
    fn from(f: &'a Flight) -> Self {
        WriteDbFlight {
            id: f.id,
            tournament_id: f.tournament_id,
            flight_number: f.flight_number as i32,
            status: status_to_text(f.status),
            notes: f.notes.as_deref(),
        }
    }
}

#[async_trait]
impl DbpFlight for PgDb {
    #[instrument(name = "db.flight.get", skip(self), fields(id = %id))]
    async fn get_flight(&self, id: Uuid) -> DbResult<Option<Flight>> {
        use crate::schema::flights::dsl;
        let mut conn = self.new_connection().await?;
        let row = dsl::flights
            .filter(dsl::id.eq(id))
            .first::<DbFlight>(&mut conn)
            .await
            .optional()
            .map_err(map_db_err)?;

        row.map(Flight::try_from).transpose()
    }

    #[instrument(name = "db.flight.save", skip(self, flight), fields(id = %flight.id))]
    async fn save_flight(&self, flight: &Flight) -> DbResult<Flight> {
        use crate::schema::flights::dsl;
        let mut conn = self.new_connection().await?;
        let w = WriteDbFlight::from(flight);

        let row = diesel::insert_into(dsl::flights)
            .values(&w)
            .on_conflict(dsl::id)
            .do_update()
            .set(&w)
            .get_result::<DbFlight>(&mut conn)
            .await
            .map_err(map_db_err)?;

        info!(saved_id = %row.id, "flight_saved");
        Flight::try_from(row)
    }

    #[instrument(name = "db.flight.list", skip(self), fields(tournament_id = %tournament_id))]
    async fn list_flights(&self, tournament_id: Uuid) -> DbResult<Vec<Flight>> {
        use crate::schema::flights::dsl;
        let mut conn = self.new_connection().await?;
        let rows = dsl::flights
            .filter(dsl::tournament_id.eq(tournament_id))
            .order(dsl::flight_number.asc())
            .load::<DbFlight>(&mut conn)
            .await
            .map_err(map_db_err)?;

        debug!(count = rows.len(), "flights_listed");
        rows.into_iter().map(Flight::try_from).collect()
    }
}
