//! implementation of the event result store port
//!
//! Same update-with-version-bump-or-insert dispatch as `save_heat`.

use crate::{PgDb, map_db_err, schema::event_results};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::{
    AsChangeset, BoolExpressionMethods, ExpressionMethods, Insertable, OptionalExtension,
    PgSortExpressionMethods, QueryDsl, Queryable,
};
use diesel::{dsl::sql, sql_types::BigInt};
use diesel_async::RunQueryDsl;
use tournament_core::{
    CompetitorType, DbError, DbResult, DbpEventResult, EventResult, ResultStatus,
};
use tracing::{info, instrument, warn};
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

fn status_to_text(s: ResultStatus) -> &'static str {
    match s {
        ResultStatus::Pending => "pending",
        ResultStatus::Completed => "completed",
    }
}

fn status_from_text(s: &str) -> DbResult<ResultStatus> {
    match s {
        "pending" => Ok(ResultStatus::Pending),
        "completed" => Ok(ResultStatus::Completed),
        other => Err(DbError::Other(anyhow::anyhow!(
            "unknown result status {other}"
        ))),
    }
}

#[derive(Debug, Queryable)]
struct DbEventResult {
    id: Uuid,
    version: i64,
    event_id: Uuid,
    competitor_id: Uuid,
    competitor_type: String,
    competitor_name: String,
    partner_name: Option<String>,
    run1_value: Option<f64>,
    run2_value: Option<f64>,
    best_run: Option<f64>,
    result_unit: Option<String>,
    final_position: Option<i32>,
    points_awarded: i32,
    payout_amount: f64,
    is_flagged: bool,
    status: String,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl TryFrom<DbEventResult> for EventResult {
    type Error = DbError;

    fn try_from(r: DbEventResult) -> Result<Self, Self::Error> {
        Ok(EventResult {
            id: r.id,
            event_id: r.event_id,
            competitor_id: r.competitor_id,
            competitor_type: competitor_type_from_text(&r.competitor_type)?,
            competitor_name: r.competitor_name,
            partner_name: r.partner_name,
            run1_value: r.run1_value,
            run2_value: r.run2_value,
            best_run: r.best_run,
            result_unit: r.result_unit,
            final_position: r.final_position.map(|v| v as u32),
            points_awarded: r.points_awarded as u32,
            payout_amount: r.payout_amount,
            is_flagged: r.is_flagged,
            status: status_from_text(&r.status)?,
            version: r.version,
        })
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = event_results)]
struct WriteDbEventResult<'a> {
    event_id: Uuid,
    competitor_id: Uuid,
    competitor_type: &'static str,
    competitor_name: &'a str,
    partner_name: Option<&'a str>,
    run1_value: Option<f64>,
    run2_value: Option<f64>,
    best_run: Option<f64>,
    result_unit: Option<&'a str>,
    final_position: Option<i32>,
    points_awarded: i32,
    payout_amount: f64,
    is_flagged: bool,
    status: &'static str,
}

impl<'a> From<&'a EventResult> for WriteDbEventResult<'a> {
    fn from(r: &'a EventResult) -> Self {
        WriteDbEventResult {
            event_id: r.event_id,
            competitor_id: r.competitor_id,
            competitor_type: competitor_type_to_text(r.competitor_type),
            competitor_name: &r.competitor_name,
            partner_name: r.partner_name.as_deref(),
            run1_value: r.run1_value,
            run2_value: r.run2_value,
            best_run: r.best_run,
            result_unit: r.result_unit.as_deref(),
            final_position: r.final_position.map(|v| v as i32),
            points_awarded: r.points_awarded as i32,
            payout_amount: r.payout_amount,
            is_flagged: r.is_flagged,
            status: status_to_text(r.status),
        }
    }
}

#[async_trait]
impl DbpEventResult for PgDb {
    #[instrument(name = "db.event_result.get", skip(self), fields(id = %id))]
    async fn get_event_result(&self, id: Uuid) -> DbResult<Option<EventResult>> {
        use crate::schema::event_results::dsl;
        let mut conn = self.new_connection().await?;
        let row = dsl::event_results
            .filter(dsl::id.eq(id))
            .first::<DbEventResult>(&mut conn)
            .await
            .optional()
            .map_err(map_db_err)?;

        row.map(EventResult::try_from).transpose()
    }

    #[instrument(
        name = "db.event_result.get_for_competitor",
        skip(self),
        fields(event_id = %event_id, competitor_id = %competitor_id)
    )]
    async fn get_event_result_for_competitor(
        &self,
        event_id: Uuid,
        competitor_id: Uuid,
    ) -> DbResult<Option<EventResult>> {
        use crate::schema::event_results::dsl;
        let mut conn = self.new_connection().await?;
        let row = dsl::event_results
            .filter(
                dsl::event_id
                    .eq(event_id)
                    .and(dsl::competitor_id.eq(competitor_id)),
            )
            .first::<DbEventResult>(&mut conn)
            .await
            .optional()
            .map_err(map_db_err)?;

        row.map(EventResult::try_from).transpose()
    }

    #[instrument(
        name = "db.event_result.save",
        skip(self, result),
        fields(id = %result.id, version = result.version)
    )]
    async fn save_event_result(&self, result: &EventResult) -> DbResult<EventResult> {
        use crate::schema::event_results::dsl;
        let mut conn = self.new_connection().await?;
        let w = WriteDbEventResult::from(result);

        let updated = diesel::update(
            dsl::event_results.filter(dsl::id.eq(result.id).and(dsl::version.eq(result.version))),
        )
        .set((&w, dsl::version.eq(sql::<BigInt>("version + 1"))))
        .get_result::<DbEventResult>(&mut conn)
        .await
        .optional()
        .map_err(map_db_err)?;

        if let Some(row) = updated {
            info!(saved_id = %row.id, new_version = row.version, "event_result_update_ok");
            return EventResult::try_from(row);
        }

        let exists = diesel::select(diesel::dsl::exists(
            dsl::event_results.filter(dsl::id.eq(result.id)),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_db_err)?;

        if exists {
            warn!("event_result_optimistic_lock_conflict");
            return Err(DbError::OptimisticLockConflict);
        }

        let row = diesel::insert_into(dsl::event_results)
            .values((dsl::id.eq(result.id), dsl::version.eq(result.version), &w))
            .get_result::<DbEventResult>(&mut conn)
            .await
            .map_err(map_db_err)?;

        info!(saved_id = %row.id, "event_result_insert_ok");
        EventResult::try_from(row)
    }

    #[instrument(name = "db.event_result.list", skip(self), fields(event_id = %event_id))]
    async fn list_event_results(&self, event_id: Uuid) -> DbResult<Vec<EventResult>> {
        use crate::schema::event_results::dsl;
        let mut conn = self.new_connection().await?;
        let rows = dsl::event_results
            .filter(dsl::event_id.eq(event_id))
            .order(dsl::final_position.asc().nulls_last())
            .load::<DbEventResult>(&mut conn)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(EventResult::try_from).collect()
    }
}
