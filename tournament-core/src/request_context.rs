//! Explicit request-scoped state, replacing ambient framework state
//! (Flask's `g`/session) with a value services take as a parameter.

use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

/// Carried into every service call: who is acting, on which tournament,
/// under what deadline, and the bits an audit row needs.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub actor_user_id: Option<Uuid>,
    pub tournament_id: Uuid,
    pub deadline: Duration,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub requested_at: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(tournament_id: Uuid, requested_at: DateTime<Utc>) -> Self {
        RequestContext {
            actor_user_id: None,
            tournament_id,
            deadline: Duration::from_secs(30),
            ip_address: None,
            user_agent: None,
            requested_at,
        }
    }

    pub fn with_actor(mut self, actor_user_id: Uuid) -> Self {
        self.actor_user_id = Some(actor_user_id);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_audit_meta(
        mut self,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent.map(|ua| ua.chars().take(255).collect());
        self
    }
}
