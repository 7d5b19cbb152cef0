//! implementation of the college competitor store port

use crate::{PgDb, map_db_err, schema::college_competitors};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::{
    AsChangeset, ExpressionMethods, Insertable, OptionalExtension, QueryDsl, Queryable,
};
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tournament_core::{
    CollegeCompetitor, CompetitorStatus, DbError, DbResult, DbpCollegeCompetitor,
    Gender,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

fn gender_to_text(g: Gender) -> &'static str {
    match g {
        Gender::Male => "male",
        Gender::Female => "female",
    }
}

fn gender_from_text(s: &str) -> DbResult<Gender> {
    match s {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        other => Err(DbError::Other(anyhow::anyhow!("unknown gender {other}"))),
    }
}

fn status_to_text(s: CompetitorStatus) -> &'static str {
    match s {
        CompetitorStatus::Active => "active",
        CompetitorStatus::Withdrawn => "withdrawn",
    }
}

fn status_from_text(s: &str) -> DbResult<CompetitorStatus> {
    match s {
        "active" => Ok(CompetitorStatus::Active),
        "withdrawn" => Ok(CompetitorStatus::Withdrawn),
        other => Err(DbError::Other(anyhow::anyhow!(
            "unknown competitor status {other}"
        ))),
    }
}

#[derive(Debug, Queryable)]
struct DbCollegeCompetitor {
    id: Uuid,
    version: i64,
    tournament_id: Uuid,
    team_id: Uuid,
    name: String,
    gender: String,
    individual_points: i32,
    events_entered: Value,
    partners: Value,
    gear_sharing: Value,
    lottery_opt_in: bool,
    is_ala_member: bool,
    status: String,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl TryFrom<DbCollegeCompetitor> for CollegeCompetitor {
    type Error = DbError;

    fn try_from(r: DbCollegeCompetitor) -> Result<Self, Self::Error> {
        Ok(CollegeCompetitor {
            id: r.id,
            tournament_id: r.tournament_id,
            team_id: r.team_id,
            name: r.name,
            gender: gender_from_text(&r.gender)?,
            individual_points: r.individual_points as u32,
            events_entered: serde_json::from_value(r.events_entered)
                .map_err(|e| DbError::Other(e.into()))?,
            partners: serde_json::from_value(r.partners).map_err(|e| DbError::Other(e.into()))?,
            gear_sharing: serde_json::from_value(r.gear_sharing)
                .map_err(|e| DbError::Other(e.into()))?,
            lottery_opt_in: r.lottery_opt_in,
            is_ala_member: r.is_ala_member,
            status: status_from_text(&r.status)?,
            version: r.version,
        })
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = college_competitors)]
struct WriteDbCollegeCompetitor<'a> {
    id: Uuid,
    tournament_id: Uuid,
    team_id: Uuid,
    name: &'a str,
    gender: &'static str,
    individual_points: i32,
    events_entered: Value,
    partners: Value,
    gear_sharing: Value,
    lottery_opt_in: bool,
    is_ala_member: bool,
    status: &'static str,
}

impl<'a> TryFrom<&'a CollegeCompetitor> for WriteDbCollegeCompetitor<'a> {
    type Error = DbError;

    fn try_from(c: &'a CollegeCompetitor) -> Result<Self, Self::Error> {
        Ok(WriteDbCollegeCompetitor {
            id: c.id,
            tournament_id: c.tournament_id,
            team_id: c.team_id,
            name: &c.name,
            gender: gender_to_text(c.gender),
            individual_points: c.individual_points as i32,
            events_entered: serde_json::to_value(&c.events_entered)
                .map_err(|e| DbError::Other(e.into()))?,
            partners: serde_json::to_value(&c.partners).map_err(|e| DbError::Other(e.into()))?,
            gear_sharing: serde_json::to_value(&c.gear_sharing)
                .map_err(|e| DbError::Other(e.into()))?,
            lottery_opt_in: c.lottery_opt_in,
            is_ala_member: c.is_ala_member,
            status: status_to_text(c.status),
        })
    }
}

#[async_trait]
impl DbpCollegeCompetitor for PgDb {
    #[instrument(name = "db.college_competitor.get", skip(self), fields(id = %id))]
    async fn get_college_competitor(&self, id: Uuid) -> DbResult<Option<CollegeCompetitor>> {
        use crate::schema::college_competitors::dsl;
        let mut conn = self.new_connection().await?;
        let row = dsl::college_competitors
            .filter(dsl::id.eq(id))
            .first::<DbCollegeCompetitor>(&mut conn)
            .await
            .optional()
            .map_err(map_db_err)?;

        row.map(CollegeCompetitor::try_from).transpose()
    }

    #[instrument(name = "db.college_competitor.save", skip(self, competitor), fields(id = %competitor.id))]
    async fn save_college_competitor(
        &self,
        competitor: &CollegeCompetitor,
    ) -> DbResult<CollegeCompetitor> {
        use crate::schema::college_competitors::dsl;
        let mut conn = self.new_connection().await?;
        let w = WriteDbCollegeCompetitor::try_from(competitor)?;

        let row = diesel::insert_into(dsl::college_competitors)
            .values(&w)
            .on_conflict(dsl::id)
            .do_update()
            .set(&w)
            .get_result::<DbCollegeCompetitor>(&mut conn)
            .await
            .map_err(map_db_err)?;

        info!(saved_id = %row.id, "college_competitor_saved");
        CollegeCompetitor::try_from(row)
    }

    #[instrument(name = "db.college_competitor.list", skip(self), fields(tournament_id = %tournament_id))]
    async fn list_college_competitors(
        &self,
        tournament_id: Uuid,
    ) -> DbResult<Vec<CollegeCompetitor>> {
        use crate::schema::college_competitors::dsl;
        let mut conn = self.new_connection().await?;
        let rows = dsl::college_competitors
            .filter(dsl::tournament_id.eq(tournament_id))
            .order(dsl::name.asc())
            .load::<DbCollegeCompetitor>(&mut conn)
            .await
            .map_err(map_db_err)?;

        debug!(count = rows.len(), "college_competitors_listed");
        rows.into_iter().map(CollegeCompetitor::try_from).collect()
    }

    #[instrument(name = "db.college_competitor.list_by_team", skip(self), fields(team_id = %team_id))]
    async fn list_college_competitors_by_team(
        &self,
        team_id: Uuid,
    ) -> DbResult<Vec<CollegeCompetitor>> {
        use crate::schema::college_competitors::dsl;
        let mut conn = self.new_connection().await?;
        let rows = dsl::college_competitors
            .filter(dsl::team_id.eq(team_id))
            .order(dsl::name.asc())
            .load::<DbCollegeCompetitor>(&mut conn)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(CollegeCompetitor::try_from).collect()
    }
}
