//! implementation of the pro competitor store port

use crate::{PgDb, map_db_err, schema::pro_competitors};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::{
    AsChangeset, ExpressionMethods, Insertable, OptionalExtension, QueryDsl, Queryable,
};
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tournament_core::{
    CompetitorStatus, DbError, DbResult, DbpProCompetitor, Gender, ProCompetitor,
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
struct DbProCompetitor {
    id: Uuid,
    version: i64,
    tournament_id: Uuid,
    name: String,
    gender: String,
    contact: Option<String>,
    is_ala_member: bool,
    lottery_opt_in: bool,
    is_left_handed_springboard: bool,
    events_entered: Value,
    partners: Value,
    gear_sharing: Value,
    entry_fees: Value,
    fees_paid: Value,
    total_earnings: f64,
    payout_settled: bool,
    status: String,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl TryFrom<DbProCompetitor> for ProCompetitor {
    type Error = DbError;

    fn try_from(r: DbProCompetitor) -> Result<Self, Self::Error> {
        Ok(ProCompetitor {
            id: r.id,
            tournament_id: r.tournament_id,
            name: r.name,
            gender: gender_from_text(&r.gender)?,
            contact: r.contact,
            is_ala_member: r.is_ala_member,
            lottery_opt_in: r.lottery_opt_in,
            is_left_handed_springboard: r.is_left_handed_springboard,
            events_entered: serde_json::from_value(r.events_entered)
                .map_err(|e| DbError::Other(e.into()))?,
            partners: serde_json::from_value(r.partners).map_err(|e| DbError::Other(e.into()))?,
            gear_sharing: serde_json::from_value(r.gear_sharing)
                .map_err(|e| DbError::Other(e.into()))?,
            entry_fees: serde_json::from_value(r.entry_fees)
                .map_err(|e| DbError::Other(e.into()))?,
            fees_paid: serde_json::from_value(r.fees_paid).map_err(|e| DbError::Other(e.into()))?,
            total_earnings: r.total_earnings,
            payout_settled: r.payout_settled,
            status: status_from_text(&r.status)?,
            version: r.version,
        })
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = pro_competitors)]
struct WriteDbProCompetitor<'a> {
    id: Uuid,
    tournament_id: Uuid,
    name: &'a str,
    gender: &'static str,
    contact: Option<&'a str>,
    is_ala_member: bool,
    lottery_opt_in: bool,
    is_left_handed_springboard: bool,
    events_entered: Value,
    partners: Value,
    gear_sharing: Value,
    entry_fees: Value,
    fees_paid: Value,
    total_earnings: f64,
    payout_settled: bool,
    status: &'static str,
}

impl<'a> TryFrom<&'a ProCompetitor> for WriteDbProCompetitor<'a> {
    type Error = DbError;

    fn try_from(c: &'a ProCompetitor) -> Result<Self, Self::Error> {
        Ok(WriteDbProCompetitor {
            id: c.id,
            tournament_id: c.tournament_id,
            name: &c.name,
            gender: gender_to_text(c.gender),
            contact: c.contact.as_deref(),
            is_ala_member: c.is_ala_member,
            lottery_opt_in: c.lottery_opt_in,
            is_left_handed_springboard: c.is_left_handed_springboard,
            events_entered: serde_json::to_value(&c.events_entered)
                .map_err(|e| DbError::Other(e.into()))?,
            partners: serde_json::to_value(&c.partners).map_err(|e| DbError::Other(e.into()))?,
            gear_sharing: serde_json::to_value(&c.gear_sharing)
                .map_err(|e| DbError::Other(e.into()))?,
            entry_fees: serde_json::to_value(&c.entry_fees).map_err(|e| DbError::Other(e.into()))?,
            fees_paid: serde_json::to_value(&c.fees_paid).map_err(|e| DbError::Other(e.into()))?,
            total_earnings: c.total_earnings,
            payout_settled: c.payout_settled,
            status: status_to_text(c.status),
        })
    }
}

#[async_trait]
impl DbpProCompetitor for PgDb {
    #[instrument(name = "db.pro_competitor.get", skip(self), fields(id = %id))]
    async fn get_pro_competitor(&self, id: Uuid) -> DbResult<Option<ProCompetitor>> {
        use crate::schema::pro_competitors::dsl;
        let mut conn = self.new_connection().await?;
        let row = dsl::pro_competitors
            .filter(dsl::id.eq(id))
            .first::<DbProCompetitor>(&mut conn)
            .await
            .optional()
            .map_err(map_db_err)?;

        row.map(ProCompetitor::try_from).transpose()
    }

    #[instrument(name = "db.pro_competitor.save", skip(self, competitor), fields(id = %competitor.id))]
    async fn save_pro_competitor(&self, competitor: &ProCompetitor) -> DbResult<ProCompetitor> {
        use crate::schema::pro_competitors::dsl;
        let mut conn = self.new_connection().await?;
        let w = WriteDbProCompetitor::try_from(competitor)?;

        let row = diesel::insert_into(dsl::pro_competitors)
            .values(&w)
            .on_conflict(dsl::id)
            .do_update()
            .set(&w)
            .get_result::<DbProCompetitor>(&mut conn)
            .await
            .map_err(map_db_err)?;

        info!(saved_id = %row.id, "pro_competitor_saved");
        ProCompetitor::try_from(row)
    }

    #[instrument(name = "db.pro_competitor.list", skip(self), fields(tournament_id = %tournament_id))]
    async fn list_pro_competitors(&self, tournament_id: Uuid) -> DbResult<Vec<ProCompetitor>> {
        use crate::schema::pro_competitors::dsl;
        let mut conn = self.new_connection().await?;
        let rows = dsl::pro_competitors
            .filter(dsl::tournament_id.eq(tournament_id))
            .order(dsl::name.asc())
            .load::<DbProCompetitor>(&mut conn)
            .await
            .map_err(map_db_err)?;

        debug!(count = rows.len(), "pro_competitors_listed");
        rows.into_iter().map(ProCompetitor::try_from).collect()
    }
}
