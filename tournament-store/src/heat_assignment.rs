//! implementation of the heat assignment store port
//!
//! Heat assignments are regenerated wholesale whenever a heat's draw
//! changes, so this port only ever appends and deletes by heat, never
//! updates a single row in place.

use crate::{PgDb, map_db_err, schema::heat_assignments};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::{ExpressionMethods, Insertable, QueryDsl, Queryable};
use diesel_async::RunQueryDsl;
use tournament_core::{CompetitorType, DbError, DbResult, DbpHeatAssignment, HeatAssignment};
use tracing::instrument;
use uuid::Uuid;

fn competitor_type_to_text(c: CompetitorType) -> &'static str {
    match c {
        CompetitorType::College => "college",
        CompetitorType::Pro => "pro",
    }
}

fn competitor_type_from_text(s: &str) -> DbResult<CompetitorType> {
    match s {
        "college" => Ok(CompetitorType::College),
        "pro" => Ok(CompetitorType::Pro),
        other => Err(DbError::Other(anyhow::anyhow!(
            "unknown competitor type {other}"
        ))),
    }
}

#[derive(Debug, Queryable)]
struct DbHeatAssignment {
    id: Uuid,
    heat_id: Uuid,
    competitor_id: Uuid,
    competitor_type: String,
    stand_number: i32,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

impl TryFrom<DbHeatAssignment> for HeatAssignment {
    type Error = DbError;

    fn try_from(r: DbHeatAssignment) -> Result<Self, Self::Error> {
        Ok(HeatAssignment {
            id: r.id,
            heat_id: r.heat_id,
            competitor_id: r.competitor_id,
            competitor_type: competitor_type_from_text(&r.competitor_type)?,
            stand_number: r.stand_number as u16,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = heat_assignments)]
struct WriteDbHeatAssignment {
    id: Uuid,
    heat_id: Uuid,
    competitor_id: Uuid,
    competitor_type: &'static str,
    stand_number: i32,
}

impl From<&HeatAssignment> for WriteDbHeatAssignment {
    fn from(a: &HeatAssignment) -> Self {
        WriteDbHeatAssignment {
            id: a.id,
            heat_id: a.heat_id,
            competitor_id: a.competitor_id,
            competitor_type: competitor_type_to_text(a.competitor_type),
            stand_number: a.stand_number as i32,
        }
    }
}

#[async_trait]
impl DbpHeatAssignment for PgDb {
    #[instrument(name = "db.heat_assignment.save", skip(self, assignment), fields(id = %assignment.id))]
    async fn save_heat_assignment(&self, assignment: &HeatAssignment) -> DbResult<HeatAssignment> {
        use crate::schema::heat_assignments::dsl;
        let mut conn = self.new_connection().await?;
        let w = WriteDbHeatAssignment::from(assignment);

        let row = diesel::insert_into(dsl::heat_assignments)
            .values(&w)
            .get_result::<DbHeatAssignment>(&mut conn)
            .await
            .map_err(map_db_err)?;

        HeatAssignment::try_from(row)
    }

    #[instrument(name = "db.heat_assignment.list", skip(self), fields(heat_id = %heat_id))]
    async fn list_heat_assignments(&self, heat_id: Uuid) -> DbResult<Vec<HeatAssignment>> {
        use crate::schema::heat_assignments::dsl;
        let mut conn = self.new_connection().await?;
        let rows = dsl::heat_assignments
            .filter(dsl::heat_id.eq(heat_id))
            .order(dsl::stand_number.asc())
            .load::<DbHeatAssignment>(&mut conn)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(HeatAssignment::try_from).collect()
    }

    #[instrument(name = "db.heat_assignment.delete", skip(self), fields(heat_id = %heat_id))]
    async fn delete_heat_assignments(&self, heat_id: Uuid) -> DbResult<()> {
        use crate::schema::heat_assignments::dsl;
        let mut conn = self.new_connection().await?;
        diesel::delete(dsl::heat_assignments.filter(dsl::heat_id.eq(heat_id)))
            .execute(&mut conn)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }
}
