//! implementation of the school captain store port

use crate::{PgDb, map_db_err, schema::school_captains};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::{
    AsChangeset, BoolExpressionMethods, ExpressionMethods, Insertable, OptionalExtension, QueryDsl,
    Queryable,
};
use diesel_async::RunQueryDsl;
use tournament_core::{DbResult, DbpSchoolCaptain, SchoolCaptain};
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Queryable)]
struct DbSchoolCaptain {
    id: Uuid,
    version: i64,
    tournament_id: Uuid,
    school_name: String,
    pin_hash: String,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl From<DbSchoolCaptain> for SchoolCaptain {
    fn from(r: DbSchoolCaptain) -> Self {
        SchoolCaptain {
            id: r.id,
            tournament_id: r.tournament_id,
            school_name: r.school_name,
            pin_hash: r.pin_hash,
            version: r.version,
        }
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = school_captains)]
struct WriteDbSchoolCaptain<'a> {
    id: Uuid,
    tournament_id: Uuid,
    school_name: &'a str,
    pin_hash: &'a str,
}

impl<'a> From<&'a SchoolCaptain> for WriteDbSchoolCaptain<'a> {
    fn from(c: &'a SchoolCaptain) -> Self {
        WriteDbSchoolCaptain {
            id: c.id,
            tournament_id: c.tournament_id,
            school_name: &c.school_name,
            pin_hash: &c.pin_hash,
        }
    }
}

#[async_trait]
impl DbpSchoolCaptain for PgDb {
    #[instrument(name = "db.school_captain.get", skip(self), fields(id = %id))]
    async fn get_school_captain(&self, id: Uuid) -> DbResult<Option<SchoolCaptain>> {
        use crate::schema::school_captains::dsl;
        let mut conn = self.new_connection().await?;
        let row = dsl::school_captains
            .filter(dsl::id.eq(id))
            .first::<DbSchoolCaptain>(&mut conn)
            .await
            .optional()
            .map_err(map_db_err)?;

        Ok(row.map(SchoolCaptain::from))
    }

    #[instrument(name = "db.school_captain.save", skip(self, captain), fields(id = %captain.id))]
    async fn save_school_captain(&self, captain: &SchoolCaptain) -> DbResult<SchoolCaptain> {
        use crate::schema::school_captains::dsl;
        let mut conn = self.new_connection().await?;
        let w = WriteDbSchoolCaptain::from(captain);

        let row = diesel::insert_into(dsl::school_captains)
            .values(&w)
            .on_conflict(dsl::id)
            .do_update()
            .set(&w)
            .get_result::<DbSchoolCaptain>(&mut conn)
            .await
            .map_err(map_db_err)?;

        info!(saved_id = %row.id, "school_captain_saved");
        Ok(row.into())
    }

    #[instrument(
        name = "db.school_captain.find_by_school",
        skip(self, school_name),
        fields(tournament_id = %tournament_id)
    )]
    async fn find_school_captain_by_school(
        &self,
        tournament_id: Uuid,
        school_name: &str,
    ) -> DbResult<Option<SchoolCaptain>> {
        use crate::schema::school_captains::dsl;
        let mut conn = self.new_connection().await?;
        let row = dsl::school_captains
            .filter(
                dsl::tournament_id
                    .eq(tournament_id)
                    .and(dsl::school_name.eq(school_name)),
            )
            .first::<DbSchoolCaptain>(&mut conn)
            .await
            .optional()
            .map_err(map_db_err)?;

        Ok(row.map(SchoolCaptain::from))
    }
}
