//! implementation of the tournament store port

use crate::{PgDb, map_db_err, schema::tournaments};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::{
    AsChangeset, ExpressionMethods, Insertable, OptionalExtension, QueryDsl, Queryable,
};
use diesel_async::RunQueryDsl;
use tournament_core::{DbError, DbResult, DbpTournament, Tournament, TournamentStatus};
use tracing::{debug, info, instrument};
use uuid::Uuid;

fn status_to_text(s: TournamentStatus) -> &'static str {
    match s {
        TournamentStatus::Setup => "setup",
        TournamentStatus::CollegeActive => "college_active",
        TournamentStatus::ProActive => "pro_active",
        TournamentStatus::Completed => "completed",
    }
}

fn status_from_text(s: &str) -> DbResult<TournamentStatus> {
    match s {
        "setup" => Ok(TournamentStatus::Setup),
        "college_active" => Ok(TournamentStatus::CollegeActive),
        "pro_active" => Ok(TournamentStatus::ProActive),
        "completed" => Ok(TournamentStatus::Completed),
        other => Err(DbError::Other(anyhow::anyhow!(
            "unknown tournament status {other}"
        ))),
    }
}

#[derive(Debug, Queryable)]
struct DbTournament {
    id: Uuid,
    version: i64,
    name: String,
    year: i32,
    status: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl TryFrom<DbTournament> for Tournament {
    type Error = DbError;

    fn try_from(r: DbTournament) -> Result<Self, Self::Error> {
        Ok(Tournament {
            id: r.id,
            name: r.name,
            year: r.year,
            status: status_from_text(&r.status)?,
            start_date: r.start_date,
            end_date: r.end_date,
            version: r.version,
        })
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = tournaments)]
struct WriteDbTournament<'a> {
    id: Uuid,
    name: &'a str,
    year: i32,
    status: &'static str,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl<'a> From<&'a Tournament> for WriteDbTournament<'a> {
    fn from(t: &'a Tournament) -> Self {
        WriteDbTournament {
            id: t.id,
            name: &t.name,
            year: t.year,
            status: status_to_text(t.status),
            start_date: t.start_date,
            end_date: t.end_date,
        }
    }
}

#[async_trait]
impl DbpTournament for PgDb {
    #[instrument(name = "db.tournament.get", skip(self), fields(id = %id))]
    async fn get_tournament(&self, id: Uuid) -> DbResult<Option<Tournament>> {
        use crate::schema::tournaments::dsl;
        let mut conn = self.new_connection().await?;
        let row = dsl::tournaments
            .filter(dsl::id.eq(id))
            .first::<DbTournament>(&mut conn)
            .await
            .optional()
            .map_err(map_db_err)?;

        row.map(Tournament::try_from).transpose()
    }

    #[instrument(name = "db.tournament.save", skip(self, tournament), fields(id = %tournament.id))]
    async fn save_tournament(&self, tournament: &Tournament) -> DbResult<Tournament> {
        use crate::schema::tournaments::dsl;
        let mut conn = self.new_connection().await?;
        let w = WriteDbTournament::from(tournament);

        let row = diesel::insert_into(dsl::tournaments)
            .values(&w)
            .on_conflict(dsl::id)
            .do_update()
            .set(&w)
            .get_result::<DbTournament>(&mut conn)
            .await
            .map_err(map_db_err)?;

        info!(saved_id = %row.id, "tournament_saved");
        Tournament::try_from(row)
    }

    #[instrument(name = "db.tournament.list", skip(self))]
    async fn list_tournaments(&self) -> DbResult<Vec<Tournament>> {
        use crate::schema::tournaments::dsl;
        let mut conn = self.new_connection().await?;
        let rows = dsl::tournaments
            .order(dsl::start_date.desc())
            .load::<DbTournament>(&mut conn)
            .await
            .map_err(map_db_err)?;

        debug!(count = rows.len(), "tournaments_listed");
        rows.into_iter().map(Tournament::try_from).collect()
    }
}
