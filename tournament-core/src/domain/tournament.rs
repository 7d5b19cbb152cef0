use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Setup,
    CollegeActive,
    ProActive,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub status: TournamentStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub version: i64,
}

impl Tournament {
    /// A college-side mutation (registration edits, heat generation) is
    /// only legal before the pro day is underway.
    pub fn accepts_college_changes(&self) -> bool {
        matches!(
            self.status,
            TournamentStatus::Setup | TournamentStatus::CollegeActive
        )
    }
}
