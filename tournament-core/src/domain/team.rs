use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    Active,
    Withdrawn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub team_code: String,
    pub school_name: String,
    pub school_abbrev: String,
    pub total_points: u32,
    pub status: TeamStatus,
    pub version: i64,
}
