//! Database port: one coarse `DatabasePort` supertrait assembled from
//! per-entity sub-traits, one per domain entity. Keeping the entities split
//! this way means a test double only has to implement the handful it
//! actually exercises, and the store crate can put each sub-trait's impl
//! in its own file.

use crate::domain::{
    AuditLog, CollegeCompetitor, Event, EventResult, Flight, Heat, HeatAssignment,
    ProCompetitor, SchoolCaptain, Team, Tournament, User,
};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub trait DatabasePort:
    DbpTournament
    + DbpTeam
    + DbpCollegeCompetitor
    + DbpProCompetitor
    + DbpEvent
    + DbpHeat
    + DbpHeatAssignment
    + DbpFlight
    + DbpEventResult
    + DbpSchoolCaptain
    + DbpUser
    + DbpAuditLog
{
    /// Cheap round-trip used by readiness probes.
    fn ping(&self) -> bool {
        true
    }
}

#[async_trait]
pub trait DbpTournament: Send + Sync {
    async fn get_tournament(&self, id: Uuid) -> DbResult<Option<Tournament>>;
    async fn save_tournament(&self, tournament: &Tournament) -> DbResult<Tournament>;
    async fn list_tournaments(&self) -> DbResult<Vec<Tournament>>;
}

#[async_trait]
pub trait DbpTeam: Send + Sync {
    async fn get_team(&self, id: Uuid) -> DbResult<Option<Team>>;
    async fn save_team(&self, team: &Team) -> DbResult<Team>;
    async fn list_teams(&self, tournament_id: Uuid) -> DbResult<Vec<Team>>;
}

#[async_trait]
pub trait DbpCollegeCompetitor: Send + Sync {
    async fn get_college_competitor(&self, id: Uuid) -> DbResult<Option<CollegeCompetitor>>;
    async fn save_college_competitor(
        &self,
        competitor: &CollegeCompetitor,
    ) -> DbResult<CollegeCompetitor>;
    async fn list_college_competitors(&self, tournament_id: Uuid) -> DbResult<Vec<CollegeCompetitor>>;
    async fn list_college_competitors_by_team(&self, team_id: Uuid) -> DbResult<Vec<CollegeCompetitor>>;
}

#[async_trait]
pub trait DbpProCompetitor: Send + Sync {
    async fn get_pro_competitor(&self, id: Uuid) -> DbResult<Option<ProCompetitor>>;
    async fn save_pro_competitor(&self, competitor: &ProCompetitor) -> DbResult<ProCompetitor>;
    async fn list_pro_competitors(&self, tournament_id: Uuid) -> DbResult<Vec<ProCompetitor>>;
}

#[async_trait]
pub trait DbpEvent: Send + Sync {
    async fn get_event(&self, id: Uuid) -> DbResult<Option<Event>>;
    async fn save_event(&self, event: &Event) -> DbResult<Event>;
    async fn list_events(&self, tournament_id: Uuid) -> DbResult<Vec<Event>>;
}

#[async_trait]
pub trait DbpHeat: Send + Sync {
    async fn get_heat(&self, id: Uuid) -> DbResult<Option<Heat>>;
    /// Update against `(id, version)`, or insert when the heat has no row
    /// yet, mirroring the optimistic-concurrency dispatch `tournament_base`
    /// uses for its entities.
    async fn save_heat(&self, heat: &Heat) -> DbResult<Heat>;
    async fn list_heats_for_event(&self, event_id: Uuid) -> DbResult<Vec<Heat>>;
}

#[async_trait]
pub trait DbpHeatAssignment: Send + Sync {
    async fn save_heat_assignment(&self, assignment: &HeatAssignment) -> DbResult<HeatAssignment>;
    async fn list_heat_assignments(&self, heat_id: Uuid) -> DbResult<Vec<HeatAssignment>>;
    async fn delete_heat_assignments(&self, heat_id: Uuid) -> DbResult<()>;
}

#[async_trait]
pub trait DbpFlight: Send + Sync {
    async fn get_flight(&self, id: Uuid) -> DbResult<Option<Flight>>;
    async fn save_flight(&self, flight: &Flight) -> DbResult<Flight>;
    async fn list_flights(&self, tournament_id: Uuid) -> DbResult<Vec<Flight>>;
}

#[async_trait]
pub trait DbpEventResult: Send + Sync {
    async fn get_event_result(&self, id: Uuid) -> DbResult<Option<EventResult>>;
    async fn get_event_result_for_competitor(
        &self,
        event_id: Uuid,
        competitor_id: Uuid,
    ) -> DbResult<Option<EventResult>>;
    /// Same UPDATE-with-version-bump-or-INSERT dispatch as `save_heat`.
    async fn save_event_result(&self, result: &EventResult) -> DbResult<EventResult>;
    async fn list_event_results(&self, event_id: Uuid) -> DbResult<Vec<EventResult>>;
}

#[async_trait]
pub trait DbpSchoolCaptain: Send + Sync {
    async fn get_school_captain(&self, id: Uuid) -> DbResult<Option<SchoolCaptain>>;
    async fn save_school_captain(&self, captain: &SchoolCaptain) -> DbResult<SchoolCaptain>;
    async fn find_school_captain_by_school(
        &self,
        tournament_id: Uuid,
        school_name: &str,
    ) -> DbResult<Option<SchoolCaptain>>;
}

#[async_trait]
pub trait DbpUser: Send + Sync {
    async fn get_user(&self, id: Uuid) -> DbResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> DbResult<Option<User>>;
    async fn save_user(&self, user: &User) -> DbResult<User>;
}

#[async_trait]
pub trait DbpAuditLog: Send + Sync {
    async fn append_audit_log(&self, entry: &AuditLog) -> DbResult<AuditLog>;
    async fn list_audit_log(&self, tournament_id: Uuid, limit: usize) -> DbResult<Vec<AuditLog>>;
}

#[derive(Debug, Error)]
pub enum DbError {
    /// Update could not find a matching id + version.
    #[error("optimistic lock conflict")]
    OptimisticLockConflict,

    /// ID does not exist.
    #[error("entity not found")]
    NotFound,

    /// Constraint name if the driver returns one.
    #[error("unique violation{0:?}")]
    UniqueViolation(Option<String>),

    /// Constraint name if the driver returns one.
    #[error("foreign key violation{0:?}")]
    ForeignKeyViolation(Option<String>),

    /// Constraint name if the driver returns one.
    #[error("check violation{0:?}")]
    CheckViolation(Option<String>),

    /// Transient DB problem; retry may work.
    #[error("serialization failure")]
    SerializationFailure,

    /// Connection, pool, or other DB errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DbResult<T> = Result<T, DbError>;
