//! implementation of the event store port

use crate::{PgDb, map_db_err, schema::events};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::{
    AsChangeset, ExpressionMethods, Insertable, OptionalExtension, QueryDsl, Queryable,
};
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tournament_core::config::StandType;
use tournament_core::{
    DbError, DbResult, DbpEvent, Event, EventDivision, EventPayouts, EventStatus,
    Gender, PartnerGenderRequirement, ScoringOrder, ScoringType,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

fn division_to_text(d: EventDivision) -> &'static str {
    match d {
        EventDivision::College => "college",
        EventDivision::Pro => "pro",
    }
}

fn division_from_text(s: &str) -> DbResult<EventDivision> {
    match s {
        "college" => Ok(EventDivision::College),
        "pro" => Ok(EventDivision::Pro),
        other => Err(DbError::Other(anyhow::anyhow!("unknown division {other}"))),
    }
}

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

fn scoring_type_to_text(s: ScoringType) -> &'static str {
    match s {
        ScoringType::Time => "time",
        ScoringType::Score => "score",
        ScoringType::Distance => "distance",
        ScoringType::Hits => "hits",
        ScoringType::Bracket => "bracket",
    }
}

fn scoring_type_from_text(s: &str) -> DbResult<ScoringType> {
    match s {
        "time" => Ok(ScoringType::Time),
        "score" => Ok(ScoringType::Score),
        "distance" => Ok(ScoringType::Distance),
        "hits" => Ok(ScoringType::Hits),
        "bracket" => Ok(ScoringType::Bracket),
        other => Err(DbError::Other(anyhow::anyhow!("unknown scoring type {other}"))),
    }
}

fn scoring_order_to_text(s: ScoringOrder) -> &'static str {
    match s {
        ScoringOrder::LowestWins => "lowest_wins",
        ScoringOrder::HighestWins => "highest_wins",
    }
}

fn scoring_order_from_text(s: &str) -> DbResult<ScoringOrder> {
    match s {
        "lowest_wins" => Ok(ScoringOrder::LowestWins),
        "highest_wins" => Ok(ScoringOrder::HighestWins),
        other => Err(DbError::Other(anyhow::anyhow!(
            "unknown scoring order {other}"
        ))),
    }
}

fn partner_req_to_text(p: PartnerGenderRequirement) -> &'static str {
    match p {
        PartnerGenderRequirement::Same => "same",
        PartnerGenderRequirement::Mixed => "mixed",
    }
}

fn partner_req_from_text(s: &str) -> DbResult<PartnerGenderRequirement> {
    match s {
        "same" => Ok(PartnerGenderRequirement::Same),
        "mixed" => Ok(PartnerGenderRequirement::Mixed),
        other => Err(DbError::Other(anyhow::anyhow!(
            "unknown partner gender requirement {other}"
        ))),
    }
}

fn stand_type_to_text(s: StandType) -> &'static str {
    match s {
        StandType::Springboard => "springboard",
        StandType::Underhand => "underhand",
        StandType::StandingBlock => "standing_block",
        StandType::CookieStack => "cookie_stack",
        StandType::SawHand => "saw_hand",
        StandType::StockSaw => "stock_saw",
        StandType::HotSaw => "hot_saw",
        StandType::ObstaclePole => "obstacle_pole",
        StandType::SpeedClimb => "speed_climb",
        StandType::Chokerman => "chokerman",
        StandType::AxeThrow => "axe_throw",
        StandType::Caber => "caber",
        StandType::Peavey => "peavey",
        StandType::PulpToss => "pulp_toss",
        StandType::Birling => "birling",
    }
}

fn stand_type_from_text(s: &str) -> DbResult<StandType> {
    match s {
        "springboard" => Ok(StandType::Springboard),
        "underhand" => Ok(StandType::Underhand),
        "standing_block" => Ok(StandType::StandingBlock),
        "cookie_stack" => Ok(StandType::CookieStack),
        "saw_hand" => Ok(StandType::SawHand),
        "stock_saw" => Ok(StandType::StockSaw),
        "hot_saw" => Ok(StandType::HotSaw),
        "obstacle_pole" => Ok(StandType::ObstaclePole),
        "speed_climb" => Ok(StandType::SpeedClimb),
        "chokerman" => Ok(StandType::Chokerman),
        "axe_throw" => Ok(StandType::AxeThrow),
        "caber" => Ok(StandType::Caber),
        "peavey" => Ok(StandType::Peavey),
        "pulp_toss" => Ok(StandType::PulpToss),
        "birling" => Ok(StandType::Birling),
        other => Err(DbError::Other(anyhow::anyhow!("unknown stand type {other}"))),
    }
}

fn status_to_text(s: EventStatus) -> &'static str {
    match s {
        EventStatus::Pending => "pending",
        EventStatus::InProgress => "in_progress",
        EventStatus::Completed => "completed",
    }
}

fn status_from_text(s: &str) -> DbResult<EventStatus> {
    match s {
        "pending" => Ok(EventStatus::Pending),
        "in_progress" => Ok(EventStatus::InProgress),
        "completed" => Ok(EventStatus::Completed),
        other => Err(DbError::Other(anyhow::anyhow!("unknown event status {other}"))),
    }
}

#[derive(Debug, Queryable)]
struct DbEvent {
    id: Uuid,
    version: i64,
    tournament_id: Uuid,
    name: String,
    division: String,
    gender: Option<String>,
    scoring_type: String,
    scoring_order: String,
    is_open: bool,
    is_partnered: bool,
    partner_gender_requirement: Option<String>,
    requires_dual_runs: bool,
    stand_type: Option<String>,
    max_stands: Option<i32>,
    has_prelims: bool,
    payouts: Value,
    status: String,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl TryFrom<DbEvent> for Event {
    type Error = DbError;

    fn try_from(r: DbEvent) -> Result<Self, Self::Error> {
        Ok(Event {
            id: r.id,
            tournament_id: r.tournament_id,
            name: r.name,
            division: division_from_text(&r.division)?,
            gender: r.gender.as_deref().map(gender_from_text).transpose()?,
            scoring_type: scoring_type_from_text(&r.scoring_type)?,
            scoring_order: scoring_order_from_text(&r.scoring_order)?,
            is_open: r.is_open,
            is_partnered: r.is_partnered,
            partner_gender_requirement: r
                .partner_gender_requirement
                .as_deref()
                .map(partner_req_from_text)
                .transpose()?,
            requires_dual_runs: r.requires_dual_runs,
            stand_type: r.stand_type.as_deref().map(stand_type_from_text).transpose()?,
            max_stands: r.max_stands.map(|v| v as u16),
            has_prelims: r.has_prelims,
            payouts: serde_json::from_value(r.payouts).map_err(|e| DbError::Other(e.into()))?,
            status: status_from_text(&r.status)?,
            version: r.version,
        })
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = events)]
struct WriteDbEvent<'a> {
    id: Uuid,
    tournament_id: Uuid,
    name: &'a str,
    division: &'static str,
    gender: Option<&'static str>,
    scoring_type: &'static str,
    scoring_order: &'static str,
    is_open: bool,
    is_partnered: bool,
    partner_gender_requirement: Option<&'static str>,
    requires_dual_runs: bool,
    stand_type: Option<&'static str>,
    max_stands: Option<i32>,
    has_prelims: bool,
    payouts: Value,
    status: &'static str,
}

impl<'a> TryFrom<&'a Event> for WriteDbEvent<'a> {
    type Error = DbError;

    fn try_from(e: &'a Event) -> Result<Self, Self::Error> {
        Ok(WriteDbEvent {
            id: e.id,
            tournament_id: e.tournament_id,
            name: &e.name,
            division: division_to_text(e.division),
            gender: e.gender.map(gender_to_text),
            scoring_type: scoring_type_to_text(e.scoring_type),
            scoring_order: scoring_order_to_text(e.scoring_order),
            is_open: e.is_open,
            is_partnered: e.is_partnered,
            partner_gender_requirement: e.partner_gender_requirement.map(partner_req_to_text),
            requires_dual_runs: e.requires_dual_runs,
            stand_type: e.stand_type.map(stand_type_to_text),
            max_stands: e.max_stands.map(|v| v as i32),
            has_prelims: e.has_prelims,
            payouts: serde_json::to_value(&e.payouts).map_err(|err| DbError::Other(err.into()))?,
            status: status_to_text(e.status),
        })
    }
}

#[async_trait]
impl DbpEvent for PgDb {
    #[instrument(name = "db.event.get", skip(self), fields(id = %id))]
    async fn get_event(&self, id: Uuid) -> DbResult<Option<Event>> {
        use crate::schema::events::dsl;
        let mut conn = self.new_connection().await?;
        let row = dsl::events
            .filter(dsl::id.eq(id))
            .first::<DbEvent>(&mut conn)
            .await
            .optional()
            .map_err(map_db_err)?;

        row.map(Event::try_from).transpose()
    }

    #[instrument(name = "db.event.save", skip(self, event), fields(id = %event.id))]
    async fn save_event(&self, event: &Event) -> DbResult<Event> {
        use crate::schema::events::dsl;
        let mut conn = self.new_connection().await?;
        let w = WriteDbEvent::try_from(event)?;

        let row = diesel::insert_into(dsl::events)
            .values(&w)
            .on_conflict(dsl::id)
            .do_update()
            .set(&w)
            .get_result::<DbEvent>(&mut conn)
            .await
            .map_err(map_db_err)?;

        info!(saved_id = %row.id, "event_saved");
        Event::try_from(row)
    }

    #[instrument(name = "db.event.list", skip(self), fields(tournament_id = %tournament_id))]
    async fn list_events(&self, tournament_id: Uuid) -> DbResult<Vec<Event>> {
        use crate::schema::events::dsl;
        let mut conn = self.new_connection().await?;
        let rows = dsl::events
            .filter(dsl::tournament_id.eq(tournament_id))
            .order(dsl::name.asc())
            .load::<DbEvent>(&mut conn)
            .await
            .map_err(map_db_err)?;

        debug!(count = rows.len(), "events_listed");
        rows.into_iter().map(Event::try_from).collect()
    }
}
