//! implementation of the team store port

use crate::{PgDb, map_db_err, schema::teams};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::{
    AsChangeset, ExpressionMethods, Insertable, OptionalExtension, QueryDsl, Queryable,
};
use diesel_async::RunQueryDsl;
use tournament_core::{DbError, DbResult, DbpTeam, Team, TeamStatus};
use tracing::{debug, info, instrument};
use uuid::Uuid;

fn status_to_text(s: TeamStatus) -> &'static str {
    match s {
        TeamStatus::Active => "active",
        TeamStatus::Withdrawn => "withdrawn",
    }
}

fn status_from_text(s: &str) -> DbResult<TeamStatus> {
    match s {
        "active" => Ok(TeamStatus::Active),
        "withdrawn" => Ok(TeamStatus::Withdrawn),
        other => Err(DbError::Other(anyhow::anyhow!("unknown team status {other}"))),
    }
}

#[derive(Debug, Queryable)]
struct DbTeam {
    id: Uuid,
    version: i64,
    tournament_id: Uuid,
    team_code: String,
    school_name: String,
    school_abbrev: String,
    total_points: i32,
    status: String,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl TryFrom<DbTeam> for Team {
    type Error = DbError;

    fn try_from(r: DbTeam) -> Result<Self, Self::Error> {
        Ok(Team {
            id: r.id,
            tournament_id: r.tournament_id,
            team_code: r.team_code,
            school_name: r.school_name,
            school_abbrev: r.school_abbrev,
            total_points: r.total_points as u32,
            status: status_from_text(&r.status)?,
            version: r.version,
        })
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = teams)]
struct WriteDbTeam<'a> {
    id: Uuid,
    tournament_id: Uuid,
    team_code: &'a str,
    school_name: &'a str,
    school_abbrev: &'a str,
    total_points: i32,
    status: &'static str,
}

impl<'a> From<&'a Team> for WriteDbTeam<'a> {
    fn from(t: &'a Team) -> Self {
        WriteDbTeam {
            id: t.id,
            tournament_id: t.tournament_id,
            team_code: &t.team_code,
            school_name: &t.school_name,
            school_abbrev: &t.school_abbrev,
            total_points: t.total_points as i32,
            status: status_to_text(t.status),
        }
    }
}

#[async_trait]
impl DbpTeam for PgDb {
    #[instrument(name = "db.team.get", skip(self), fields(id = %id))]
    async fn get_team(&self, id: Uuid) -> DbResult<Option<Team>> {
        use crate::schema::teams::dsl;
        let mut conn = self.new_connection().await?;
        let row = dsl::teams
            .filter(dsl::id.eq(id))
            .first::<DbTeam>(&mut conn)
            .await
            .optional()
            .map_err(map_db_err)?;

        row.map(Team::try_from).transpose()
    }

    #[instrument(name = "db.team.save", skip(self, team), fields(id = %team.id))]
    async fn save_team(&self, team: &Team) -> DbResult<Team> {
        use crate::schema::teams::dsl;
        let mut conn = self.new_connection().await?;
        let w = WriteDbTeam::from(team);

        let row = diesel::insert_into(dsl::teams)
            .values(&w)
            .on_conflict(dsl::id)
            .do_update()
            .set(&w)
            .get_result::<DbTeam>(&mut conn)
            .await
            .map_err(map_db_err)?;

        info!(saved_id = %row.id, "team_saved");
        Team::try_from(row)
    }

    #[instrument(name = "db.team.list", skip(self), fields(tournament_id = %tournament_id))]
    async fn list_teams(&self, tournament_id: Uuid) -> DbResult<Vec<Team>> {
        use crate::schema::teams::dsl;
        let mut conn = self.new_connection().await?;
        let rows = dsl::teams
            .filter(dsl::tournament_id.eq(tournament_id))
            .order(dsl::school_name.asc())
            .load::<DbTeam>(&mut conn)
            .await
            .map_err(map_db_err)?;

        debug!(count = rows.len(), "teams_listed");
        rows.into_iter().map(Team::try_from).collect()
    }
}
