//! implementation of the audit log store port
//!
//! Append-only: there is no update path, matching the port's
//! `append_audit_log` + `list_audit_log` surface.

use crate::{PgDb, map_db_err, schema::audit_logs};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::{ExpressionMethods, Insertable, QueryDsl, Queryable};
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tournament_core::{AuditLog, DbResult, DbpAuditLog};
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Queryable)]
struct DbAuditLog {
    id: Uuid,
    tournament_id: Uuid,
    actor_user_id: Option<Uuid>,
    action: String,
    entity_type: String,
    entity_id: Option<Uuid>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    details: Value,
    created_at: DateTime<Utc>,
}

impl From<DbAuditLog> for AuditLog {
    fn from(r: DbAuditLog) -> Self {
        AuditLog {
            id: r.id,
            tournament_id: r.tournament_id,
            actor_user_id: r.actor_user_id,
            action: r.action,
            entity_type: r.entity_type,
            entity_id: r.entity_id,
            ip_address: r.ip_address,
            user_agent: r.user_agent,
            details: r.details,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = audit_logs)]
struct WriteDbAuditLog<'a> {
    id: Uuid,
    tournament_id: Uuid,
    actor_user_id: Option<Uuid>,
    action: &'a str,
    entity_type: &'a str,
    entity_id: Option<Uuid>,
    ip_address: Option<&'a str>,
    user_agent: Option<&'a str>,
    details: &'a Value,
}

impl<'a> From<&'a AuditLog> for WriteDbAuditLog<'a> {
    fn from(a: &'a AuditLog) -> Self {
        WriteDbAuditLog {
            id: a.id,
            tournament_id: a.tournament_id,
            actor_user_id: a.actor_user_id,
            action: &a.action,
            entity_type: &a.entity_type,
            entity_id: a.entity_id,
            ip_address: a.ip_address.as_deref(),
            user_agent: a.user_agent.as_deref(),
            details: &a.details,
        }
    }
}

#[async_trait]
impl DbpAuditLog for PgDb {
    #[instrument(name = "db.audit_log.append", skip(self, entry), fields(id = %entry.id))]
    async fn append_audit_log(&self, entry: &AuditLog) -> DbResult<AuditLog> {
        use crate::schema::audit_logs::dsl;
        let mut conn = self.new_connection().await?;
        let w = WriteDbAuditLog::from(entry);

        let row = diesel::insert_into(dsl::audit_logs)
            .values(&w)
            .get_result::<DbAuditLog>(&mut conn)
            .await
            .map_err(map_db_err)?;

        Ok(row.into())
    }

    #[instrument(name = "db.audit_log.list", skip(self), fields(tournament_id = %tournament_id, limit))]
    async fn list_audit_log(&self, tournament_id: Uuid, limit: usize) -> DbResult<Vec<AuditLog>> {
        use crate::schema::audit_logs::dsl;
        let mut conn = self.new_connection().await?;
        let rows = dsl::audit_logs
            .filter(dsl::tournament_id.eq(tournament_id))
            .order(dsl::created_at.desc())
            .limit(limit as i64)
            .load::<DbAuditLog>(&mut conn)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(AuditLog::from).collect())
    }
}
