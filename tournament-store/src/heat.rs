//! implementation of the heat store port
//!
//! `save_heat` uses an update-with-version-bump-or-insert dispatch: try
//! the UPDATE against `(id, version)` first, and only fall back to an
//! INSERT (or surface a conflict) when that UPDATE touches no row.

use crate::{PgDb, map_db_err, schema::heats};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::{
    AsChangeset, BoolExpressionMethods, ExpressionMethods, Insertable, OptionalExtension, QueryDsl,
    Queryable,
};
use diesel::{dsl::sql, sql_types::BigInt};
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tournament_core::{DbError, DbResult, DbpHeat, Heat, HeatStatus};
use tracing::{info, instrument, warn};
use uuid::Uuid;

fn status_to_text(s: HeatStatus) -> &'static str {
    match s {
        HeatStatus::Scheduled => "scheduled",
        HeatStatus::Completed => "completed",
    }
}

fn status_from_text(s: &str) -> DbResult<HeatStatus> {
    match s {
        "scheduled" => Ok(HeatStatus::Scheduled),
        "completed" => Ok(HeatStatus::Completed),
        other => Err(DbError::Other(anyhow::anyhow!("unknown heat status {other}"))),
    }
}

#[derive(Debug, Queryable)]
struct DbHeat {
    id: Uuid,
    version: i64,
    event_id: Uuid,
    heat_number: i32,
    run_number: i16,
    competitors: Value,
    stand_assignments: Value,
    flight_id: Option<Uuid>,
    status: String,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl TryFrom<DbHeat> for Heat {
    type Error = DbError;

    fn try_from(r: DbHeat) -> Result<Self, Self::Error> {
        Ok(Heat {
            id: r.id,
            event_id: r.event_id,
            heat_number: r.heat_number as u32,
            run_number: r.run_number as u8,
            competitors: serde_json::from_value(r.competitors).map_err(|e| DbError::Other(e.into()))?,
            stand_assignments: serde_json::from_value(r.stand_assignments)
                .map_err(|e| DbError::Other(e.into()))?,
            flight_id: r.flight_id,
            status: status_from_text(&r.status)?,
            version: r.version,
        })
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = heats)]
struct WriteDbHeat {
    event_id: Uuid,
    heat_number: i32,
    run_number: i16,
    competitors: Value,
    stand_assignments: Value,
    flight_id: Option<Uuid>,
    status: &'static str,
}

impl TryFrom<&Heat> for WriteDbHeat {
    type Error = DbError;

    fn try_from(h: &Heat) -> Result<Self, Self::Error> {
        Ok(WriteDbHeat {
            event_id: h.event_id,
            heat_number: h.heat_number as i32,
            run_number: h.run_number as i16,
            competitors: serde_json::to_value(&h.competitors).map_err(|e| DbError::Other(e.into()))?,
            stand_assignments: serde_json::to_value(&h.stand_assignments)
                .map_err(|e| DbError::Other(e.into()))?,
            flight_id: h.flight_id,
            status: status_to_text(h.status),
        })
    }
}

#[async_trait]
impl DbpHeat for PgDb {
    #[instrument(name = "db.heat.get", skip(self), fields(id = %id))]
    async fn get_heat(&self, id: Uuid) -> DbResult<Option<Heat>> {
        use crate::schema::heats::dsl;
        let mut conn = self.new_connection().await?;
        let row = dsl::heats
            .filter(dsl::id.eq(id))
            .first::<DbHeat>(&mut conn)
            .await
            .optional()
            .map_err(map_db_err)?;

        row.map(Heat::try_from).transpose()
    }

    #[instrument(
        name = "db.heat.save",
        skip(self, heat),
        fields(id = %heat.id, version = heat.version)
    )]
    async fn save_heat(&self, heat: &Heat) -> DbResult<Heat> {
        use crate::schema::heats::dsl;
        let mut conn = self.new_connection().await?;
        let w = WriteDbHeat::try_from(heat)?;

        let updated = diesel::update(
            dsl::heats.filter(dsl::id.eq(heat.id).and(dsl::version.eq(heat.version))),
        )
        .set((&w, dsl::version.eq(sql::<BigInt>("version + 1"))))
        .get_result::<DbHeat>(&mut conn)
        .await
        .optional()
        .map_err(map_db_err)?;

        if let Some(row) = updated {
            info!(saved_id = %row.id, new_version = row.version, "heat_update_ok");
            return Heat::try_from(row);
        }

        let exists = diesel::select(diesel::dsl::exists(dsl::heats.filter(dsl::id.eq(heat.id))))
            .get_result::<bool>(&mut conn)
            .await
            .map_err(map_db_err)?;

        if exists {
            warn!("heat_optimistic_lock_conflict");
            return Err(DbError::OptimisticLockConflict);
        }

        let row = diesel::insert_into(dsl::heats)
            .values((dsl::id.eq(heat.id), dsl::version.eq(heat.version), &w))
            .get_result::<DbHeat>(&mut conn)
            .await
            .map_err(map_db_err)?;

        info!(saved_id = %row.id, "heat_insert_ok");
        Heat::try_from(row)
    }

    #[instrument(name = "db.heat.list_for_event", skip(self), fields(event_id = %event_id))]
    async fn list_heats_for_event(&self, event_id: Uuid) -> DbResult<Vec<Heat>> {
        use crate::schema::heats::dsl;
        let mut conn = self.new_connection().await?;
        let rows = dsl::heats
            .filter(dsl::event_id.eq(event_id))
            .order((dsl::heat_number.asc(), dsl::run_number.asc()))
            .load::<DbHeat>(&mut conn)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(Heat::try_from).collect()
    }
}
